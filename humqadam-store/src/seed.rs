//! Records shipped with the app. Their ids are fixed and never handed out to user entities.
use humqadam_entity::{Comment, Community, MarketItem, Story};

pub fn default_communities() -> Vec<Community> {
  vec![
    Community {
      id: "comm-gikians".to_string(),
      name: "GIKians Connect".to_string(),
      area: "GIK Institute, Topi".to_string(),
      members: 3800,
      description: "Connect with students, alumni, and faculty of GIK Institute for networking and discussions.".to_string(),
      image: "https://giki.edu.pk/wp-content/uploads/2019/09/10649697_710129879074987_5414857352736262169_n.jpg".to_string(),
      joined: true,
    },
    Community {
      id: "comm-football".to_string(),
      name: "Footballers Club".to_string(),
      area: "Local Grounds".to_string(),
      members: 125,
      description: "Connect with local footballers, find matches, and organize practice sessions in your area.".to_string(),
      image: "https://wallpapers.com/images/hd/messi-pictures-9qppxor06pzudlr1.jpg".to_string(),
      joined: true,
    },
    Community {
      id: "comm-northern-trips".to_string(),
      name: "Northern Area Trips".to_string(),
      area: "Gilgit-Baltistan & KPK".to_string(),
      members: 1600,
      description: "Plan and discuss trips, share breathtaking photos, and find travel companions for Northern Pakistan adventures.".to_string(),
      image: "https://pyaraskardu.com/wp-content/uploads/2023/04/fairy-meadows.jpg".to_string(),
      joined: false,
    },
    Community {
      id: "comm-cricket".to_string(),
      name: "Cricket Fanatics Pakistan".to_string(),
      area: "Nationwide".to_string(),
      members: 950,
      description: "Discuss your favorite matches, players, and everything about cricket with fans across Pakistan.".to_string(),
      image: "https://media.istockphoto.com/id/641189676/photo/cricket-stadium.jpg?s=612x612&w=0&k=20&c=6aUm1D7NiTTR6ZC4MCcLW2zBnMbIwfqDqc8NBIDATn4=".to_string(),
      joined: false,
    },
  ]
}

#[allow(clippy::too_many_arguments)]
fn market_item(
  id: &str,
  name: &str,
  description: &str,
  image_url: &str,
  location: &str,
  pickup_times: &str,
  giver_name: &str,
  background: &str,
  giver_contact_info: &str,
  price: f64,
) -> MarketItem {
  MarketItem {
    id: id.to_string(),
    name: name.to_string(),
    description: description.to_string(),
    image_url: Some(image_url.to_string()),
    location: location.to_string(),
    pickup_times: pickup_times.to_string(),
    giver_name: giver_name.to_string(),
    giver_profile_pic_url: Some(format!(
      "https://ui-avatars.com/api/?name={}&background={}&color=fff",
      giver_name.replace(' ', "+"),
      background
    )),
    giver_contact_info: giver_contact_info.to_string(),
    price: Some(price),
  }
}

pub fn default_market_items() -> Vec<MarketItem> {
  vec![
    market_item(
      "initial-1",
      "Old Books Collection",
      "A mix of novels, textbooks, and magazines. Around 50 books.",
      "https://images.unsplash.com/photo-1550399105-c4db5fb85c18?ixlib=rb-4.0.3&ixid=M3wxMjA3fDB8MHxzZWFyY2h8NXx8Ym9va3N8ZW58MHx8MHx8fDA%3D&auto=format&fit=crop&w=500&q=60",
      "Sector G-9, Islamabad",
      "Weekends 11 AM - 4 PM",
      "Ali Khan",
      "c084fc",
      "Message via App",
      0.0,
    ),
    market_item(
      "initial-2",
      "Comfy Armchair",
      "Single seater armchair, good condition, minor wear.",
      "https://images.unsplash.com/photo-1598300042247-d088f8ab3a91?ixlib=rb-4.0.3&ixid=M3wxMjA3fDB8MHxzZWFyY2h8Mnx8YXJmY2hhaXJ8ZW58MHx8MHx8fDA%3D&auto=format&fit=crop&w=500&q=60",
      "Sector F-11, Islamabad",
      "Weekdays after 6 PM",
      "Fatima Ahmed",
      "f0abfc",
      "Call 0312-3456789",
      3500.0,
    ),
    market_item(
      "initial-3",
      "Kids Bicycle",
      "Small bicycle for ages 5-8. Needs minor tire repair.",
      "https://cdn.pixabay.com/photo/2021/10/26/16/51/amsterdam-6744567_1280.jpg",
      "Bahria Town, Phase 4",
      "Any day 2 PM - 5 PM",
      "Usman Ali",
      "c084fc",
      "Message via App",
      0.0,
    ),
    market_item(
      "initial-4",
      "Assorted Kitchen Utensils",
      "Spoons, forks, knives, spatulas. Used but functional.",
      "https://cdn.pixabay.com/photo/2017/09/05/01/27/kitchen-2716156_1280.png",
      "Sector I-8, Islamabad",
      "Flexible, contact to arrange",
      "Ayesha Khan",
      "f0abfc",
      "Message via App",
      0.0,
    ),
    market_item(
      "initial-5",
      "Box of Clothes",
      "Mixed adult clothing, various sizes. Cleaned and folded.",
      "https://cdn.pixabay.com/photo/2014/08/26/21/48/sweatshirts-428607_1280.jpg",
      "Sector E-7, Islamabad",
      "Sunday mornings",
      "Zainab Bilal",
      "c084fc",
      "Message via App",
      0.0,
    ),
  ]
}

const STORY_AUTHORS: [&str; 7] = [
  "Ahmed Khan",
  "Fatima Ali",
  "Zainab Malik",
  "Usman Ahmed",
  "Ayesha Khan",
  "Bilal Hassan",
  "Hina Shah",
];

const STORY_CITIES: [&str; 7] = [
  "Karachi",
  "Lahore",
  "Islamabad",
  "Faisalabad",
  "Peshawar",
  "Quetta",
  "Multan",
];

pub const STORY_CATEGORIES: [&str; 7] = [
  "Personal Growth",
  "Entrepreneurship",
  "Health",
  "Education",
  "Parenting",
  "Community Service",
  "Career Development",
];

const STORY_DATES: [&str; 5] = [
  "March 2, 2025",
  "March 9, 2025",
  "March 15, 2025",
  "March 21, 2025",
  "March 28, 2025",
];

const COMMENT_TEXTS: [&str; 5] = [
  "This is so inspiring! Mashallah!",
  "Keep up the good work! Allah bless you.",
  "I went through something similar in Pakistan.",
  "Thank you for sharing your experience.",
  "This gives me hope for our country!",
];

fn story_content(index: usize, city: &str) -> String {
  match index % 5 {
    0 => format!("Overcame financial hardships to build a successful business in {city}."),
    1 => "After finding the right resources, I was able to start a new chapter.".to_string(),
    2 => "As a single parent, the community support helped me provide for my children.".to_string(),
    3 => "Started a small initiative that has now grown to help many families.".to_string(),
    _ => "Through hard work, I transformed my life and now run my own company.".to_string(),
  }
}

fn seed_comments(story_index: usize) -> Vec<Comment> {
  (0..2 + story_index % 3)
    .map(|i| {
      let user = STORY_AUTHORS[(story_index + i + 1) % STORY_AUTHORS.len()];
      let first_name = user.split(' ').next().unwrap_or(user);
      Comment {
        id: format!("story-{}-comment-{}", story_index + 1, i + 1),
        user: user.to_string(),
        avatar: format!("https://ui-avatars.com/api/?name={first_name}&background=random"),
        text: COMMENT_TEXTS[(story_index + i) % COMMENT_TEXTS.len()].to_string(),
        timestamp: format!("{} hours ago", 2 + i * 3),
      }
    })
    .collect()
}

pub fn default_stories() -> Vec<Story> {
  STORY_DATES
    .iter()
    .enumerate()
    .map(|(i, date)| {
      let city = STORY_CITIES[i % STORY_CITIES.len()];
      Story {
        id: format!("story-{}", i + 1),
        name: STORY_AUTHORS[i % STORY_AUTHORS.len()].to_string(),
        location: city.to_string(),
        content: story_content(i, city),
        image_url: Some(format!(
          "https://source.unsplash.com/random/800x600/?pakistan,{city},{i}"
        )),
        category: STORY_CATEGORIES[i % STORY_CATEGORIES.len()].to_string(),
        date: date.to_string(),
        is_user_story: false,
        reactions: vec![],
        comments: seed_comments(i),
      }
    })
    .collect()
}
