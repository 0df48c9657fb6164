/// Location of generated media as reported by the remote operation. It is not
/// retrievable until it has been authorized with the caller's credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaLocator(String);

impl MediaLocator {
    pub fn new(uri: impl Into<String>) -> Self {
        Self(uri.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The media host expects the key appended after the locator's own
    /// query (`...?alt=media&key=...`).
    pub fn authorize(&self, credential: &str) -> String {
        format!("{}&key={}", self.0, credential)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appends_credential_as_key_parameter() {
        let locator = MediaLocator::new("https://media/x");
        assert_eq!(locator.authorize("valid-key"), "https://media/x&key=valid-key");
    }

    #[test]
    fn keeps_existing_query() {
        let locator = MediaLocator::new("https://host/v1/files/abc:download?alt=media");
        assert_eq!(
            locator.authorize("k"),
            "https://host/v1/files/abc:download?alt=media&key=k"
        );
    }
}
