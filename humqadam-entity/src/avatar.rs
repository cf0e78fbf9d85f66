use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

const AVATAR_HOST: &str = "https://ui-avatars.com/api/";

/// Characters a browser's `encodeURIComponent` leaves as they are.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
  .remove(b'-')
  .remove(b'_')
  .remove(b'.')
  .remove(b'!')
  .remove(b'~')
  .remove(b'*')
  .remove(b'\'')
  .remove(b'(')
  .remove(b')');

/// Builds the generated avatar url shown next to a person's name.
///
/// Blank names render as `??`.
pub fn avatar_url(name: &str) -> String {
  let name = name.trim();
  let name = if name.is_empty() { "??" } else { name };
  let encoded = utf8_percent_encode(name, URI_COMPONENT).to_string();
  format!("{AVATAR_HOST}?name={encoded}&background=random&color=fff")
}
