use once_cell::sync::Lazy;
use regex::Regex;

const ZIP_CODE_LENGTH: usize = 5;

#[derive(Clone, Debug, PartialEq)]
pub struct ZipCode(String);

impl ZipCode {
    pub fn parse(s: String) -> Result<ZipCode, String> {
        static RE: Lazy<Regex> = Lazy::new(|| {
            Regex::new(&format!(r"^[0-9]{{{ZIP_CODE_LENGTH}}}$")).expect("ZIP code regex is valid")
        });

        if RE.is_match(&s) {
            Ok(Self(s))
        } else {
            Err(format!("`{s}` is not a {ZIP_CODE_LENGTH} digit ZIP code"))
        }
    }
}

impl AsRef<str> for ZipCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
