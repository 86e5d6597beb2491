//! Source URL rewriting

/// Suffix that replaces everything from `/edit` onwards
const EXPORT_SUFFIX: &str = "/export?format=txt";

/// Turn a document's edit URL into its plain-text export URL.
///
/// `https://docs.google.com/document/d/ID/edit?usp=sharing` becomes
/// `https://docs.google.com/document/d/ID/export?format=txt`. URLs without an
/// `/edit` segment are returned unchanged.
pub fn export_url(url: &str) -> String {
    match url.find("/edit") {
        Some(index) => format!("{}{}", &url[..index], EXPORT_SUFFIX),
        None => url.to_string(),
    }
}
