//! Breach and paste records as returned by the service.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

/// Where relative logo paths, as sent by older API versions, are served from.
pub const LOGO_BASE_URL: &str = "https://haveibeenpwned.com/Content/Images/PwnedLogos/";

/// A breach loaded into the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Breach {
    title: String,
    name: String,
    domain: String,
    #[serde(deserialize_with = "crate::date::deserialize")]
    breach_date: DateTime<Utc>,
    #[serde(deserialize_with = "crate::date::deserialize")]
    added_date: DateTime<Utc>,
    #[serde(deserialize_with = "crate::date::deserialize")]
    modified_date: DateTime<Utc>,
    pwn_count: u64,
    description: String,
    data_classes: Vec<String>,
    is_verified: bool,
    is_fabricated: bool,
    is_sensitive: bool,
    is_retired: bool,
    is_spam_list: bool,
    #[serde(default)]
    logo_path: Option<String>,
}

impl Breach {
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Stable identifier of the breach in the service.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// When the breach occurred. Often approximate, since breaches tend to
    /// surface long after the fact.
    pub fn breach_date(&self) -> DateTime<Utc> {
        self.breach_date
    }

    pub fn added_date(&self) -> DateTime<Utc> {
        self.added_date
    }

    pub fn modified_date(&self) -> DateTime<Utc> {
        self.modified_date
    }

    /// Number of accounts affected.
    pub fn pwn_count(&self) -> u64 {
        self.pwn_count
    }

    /// HTML description of the breach.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Kinds of data exposed, e.g. "Email addresses" or "Passwords".
    pub fn data_classes(&self) -> &[String] {
        &self.data_classes
    }

    pub fn is_verified(&self) -> bool {
        self.is_verified
    }

    /// Whether the data was attributed to a site it did not come from.
    pub fn is_fabricated(&self) -> bool {
        self.is_fabricated
    }

    pub fn is_sensitive(&self) -> bool {
        self.is_sensitive
    }

    pub fn is_retired(&self) -> bool {
        self.is_retired
    }

    pub fn is_spam_list(&self) -> bool {
        self.is_spam_list
    }

    pub fn logo_path(&self) -> Option<&str> {
        self.logo_path.as_deref()
    }

    /// The logo as a URL, if a non-empty, parseable path is present.
    ///
    /// Relative paths resolve against [`LOGO_BASE_URL`].
    pub fn logo_url(&self) -> Option<Url> {
        let path = self.logo_path().filter(|path| !path.is_empty())?;
        Url::parse(LOGO_BASE_URL).and_then(|base| base.join(path)).ok()
    }
}

/// An appearance of an email address in a public paste.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Paste {
    source: String,
    #[serde(rename = "Id")]
    identifier: String,
    #[serde(default)]
    title: Option<String>,
    #[serde(default, deserialize_with = "crate::date::deserialize_option")]
    date: Option<DateTime<Utc>>,
    email_count: u64,
}

impl Paste {
    /// Name of the paste service, as sent by the API.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn date(&self) -> Option<DateTime<Utc>> {
        self.date
    }

    pub fn email_count(&self) -> u64 {
        self.email_count
    }

    /// The paste service, when the source is one the library knows.
    pub fn service(&self) -> Option<PasteService> {
        self.source.parse().ok()
    }

    /// Browsable URL of the paste, for services that have one.
    pub fn url(&self) -> Option<String> {
        self.service().and_then(|service| service.url_for(&self.identifier))
    }
}

/// The paste services the breach service monitors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PasteService {
    Pastebin,
    Pastie,
    Slexy,
    Ghostbin,
    QuickLeak,
    JustPaste,
    AdHocUrl,
    OptOut,
}

impl PasteService {
    pub const ALL: [PasteService; 8] = [
        PasteService::Pastebin,
        PasteService::Pastie,
        PasteService::Slexy,
        PasteService::Ghostbin,
        PasteService::QuickLeak,
        PasteService::JustPaste,
        PasteService::AdHocUrl,
        PasteService::OptOut,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PasteService::Pastebin => "Pastebin",
            PasteService::Pastie => "Pastie",
            PasteService::Slexy => "Slexy",
            PasteService::Ghostbin => "Ghostbin",
            PasteService::QuickLeak => "QuickLeak",
            PasteService::JustPaste => "JustPaste",
            PasteService::AdHocUrl => "AdHocUrl",
            PasteService::OptOut => "OptOut",
        }
    }

    /// URL of paste `identifier` on this service. `None` for services
    /// without public paste URLs.
    pub fn url_for(&self, identifier: &str) -> Option<String> {
        match self {
            PasteService::Pastebin => Some(format!("https://pastebin.com/{identifier}")),
            PasteService::Pastie => Some(format!("https://pastiebin.org/{identifier}")),
            PasteService::Slexy => Some(format!("https://slexy.org/view/{identifier}")),
            PasteService::Ghostbin => Some(format!("https://ghostbin.com/paste/{identifier}")),
            PasteService::JustPaste => Some(format!("https://justpaste.it/{identifier}")),
            PasteService::QuickLeak | PasteService::AdHocUrl | PasteService::OptOut => None,
        }
    }
}

impl fmt::Display for PasteService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown paste service '{0}'")]
pub struct UnknownPasteService(pub String);

impl FromStr for PasteService {
    type Err = UnknownPasteService;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PasteService::ALL
            .into_iter()
            .find(|service| service.as_str() == s)
            .ok_or_else(|| UnknownPasteService(s.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    const ADOBE: &str = r#"{
        "Name": "Adobe",
        "Title": "Adobe",
        "Domain": "adobe.com",
        "BreachDate": "2013-10-04",
        "AddedDate": "2013-12-04T00:00:00Z",
        "ModifiedDate": "2022-05-15T23:52:49Z",
        "PwnCount": 152445165,
        "Description": "In October 2013, 153 million Adobe accounts were breached.",
        "LogoPath": "https://haveibeenpwned.com/Content/Images/PwnedLogos/Adobe.png",
        "DataClasses": ["Email addresses", "Password hints", "Passwords", "Usernames"],
        "IsVerified": true,
        "IsFabricated": false,
        "IsSensitive": false,
        "IsRetired": false,
        "IsSpamList": false,
        "IsMalware": false
    }"#;

    #[test]
    fn test_decode_breach() {
        let breach: Breach = serde_json::from_str(ADOBE).unwrap();
        assert_eq!(breach.name(), "Adobe");
        assert_eq!(breach.domain(), "adobe.com");
        assert_eq!(breach.breach_date(), Utc.with_ymd_and_hms(2013, 10, 4, 0, 0, 0).unwrap());
        assert_eq!(breach.added_date(), Utc.with_ymd_and_hms(2013, 12, 4, 0, 0, 0).unwrap());
        assert_eq!(breach.pwn_count(), 152_445_165);
        assert_eq!(breach.data_classes()[2], "Passwords");
        assert!(breach.is_verified());
        assert!(!breach.is_spam_list());
        assert_eq!(
            breach.logo_url().unwrap().as_str(),
            "https://haveibeenpwned.com/Content/Images/PwnedLogos/Adobe.png"
        );
    }

    #[test]
    fn test_breach_logo_url_absent() {
        let without_logo = ADOBE.replace(
            r#""LogoPath": "https://haveibeenpwned.com/Content/Images/PwnedLogos/Adobe.png","#,
            "",
        );
        let breach: Breach = serde_json::from_str(&without_logo).unwrap();
        assert_eq!(breach.logo_path(), None);
        assert_eq!(breach.logo_url(), None);

        let empty_logo = ADOBE.replace(
            "https://haveibeenpwned.com/Content/Images/PwnedLogos/Adobe.png",
            "",
        );
        let breach: Breach = serde_json::from_str(&empty_logo).unwrap();
        assert_eq!(breach.logo_path(), Some(""));
        assert_eq!(breach.logo_url(), None);
    }

    #[test]
    fn test_breach_relative_logo_path() {
        let relative = ADOBE
            .replace("https://haveibeenpwned.com/Content/Images/PwnedLogos/Adobe.png", "Adobe.png");
        let breach: Breach = serde_json::from_str(&relative).unwrap();
        assert_eq!(breach.logo_path(), Some("Adobe.png"));
        assert_eq!(
            breach.logo_url().unwrap().as_str(),
            "https://haveibeenpwned.com/Content/Images/PwnedLogos/Adobe.png"
        );

        let rooted = ADOBE.replace(
            "https://haveibeenpwned.com/Content/Images/PwnedLogos/Adobe.png",
            "/Content/Images/PwnedLogos/Adobe.png",
        );
        let breach: Breach = serde_json::from_str(&rooted).unwrap();
        assert_eq!(
            breach.logo_url().unwrap().as_str(),
            "https://haveibeenpwned.com/Content/Images/PwnedLogos/Adobe.png"
        );
    }

    #[test]
    fn test_breach_bad_date_names_the_value() {
        let bad = ADOBE.replace("2013-10-04", "04/10/2013");
        let err = serde_json::from_str::<Breach>(&bad).unwrap_err();
        assert!(err.to_string().contains("Error parsing '04/10/2013'"), "{err}");
    }

    #[test]
    fn test_decode_paste() {
        let json = r#"{
            "Source": "Pastebin",
            "Id": "8Q0BvKD8",
            "Title": "syslog",
            "Date": "2014-03-04T19:14:54Z",
            "EmailCount": 139
        }"#;
        let paste: Paste = serde_json::from_str(json).unwrap();
        assert_eq!(paste.service(), Some(PasteService::Pastebin));
        assert_eq!(paste.title(), Some("syslog"));
        assert_eq!(paste.email_count(), 139);
        assert_eq!(paste.url().as_deref(), Some("https://pastebin.com/8Q0BvKD8"));
    }

    #[test]
    fn test_decode_paste_without_optionals() {
        let json = r#"{"Source": "AdHocUrl", "Id": "http://example.com/x", "Title": null,
                       "Date": null, "EmailCount": 2}"#;
        let paste: Paste = serde_json::from_str(json).unwrap();
        assert_eq!(paste.title(), None);
        assert_eq!(paste.date(), None);
        assert_eq!(paste.url(), None);

        let json = r#"{"Source": "OptOut", "Id": "x", "EmailCount": 1}"#;
        let paste: Paste = serde_json::from_str(json).unwrap();
        assert_eq!(paste.date(), None);
    }

    #[test]
    fn test_unknown_paste_source_still_decodes() {
        let json = r#"{"Source": "NewBin", "Id": "abc", "EmailCount": 5}"#;
        let paste: Paste = serde_json::from_str(json).unwrap();
        assert_eq!(paste.source(), "NewBin");
        assert_eq!(paste.service(), None);
        assert_eq!(paste.url(), None);
    }

    #[test]
    fn test_paste_service_urls() {
        assert_eq!(PasteService::Slexy.url_for("1").as_deref(), Some("https://slexy.org/view/1"));
        assert_eq!(
            PasteService::Ghostbin.url_for("1").as_deref(),
            Some("https://ghostbin.com/paste/1")
        );
        assert_eq!(PasteService::Pastie.url_for("1").as_deref(), Some("https://pastiebin.org/1"));
        assert_eq!(PasteService::JustPaste.url_for("1").as_deref(), Some("https://justpaste.it/1"));
        assert_eq!(PasteService::QuickLeak.url_for("1"), None);
        assert_eq!(PasteService::OptOut.url_for("1"), None);
    }

    #[test]
    fn test_paste_service_names() {
        for service in PasteService::ALL {
            assert_eq!(service.as_str().parse::<PasteService>(), Ok(service));
        }
        assert!("pastebin".parse::<PasteService>().is_err());
    }
}
