//! 고정 태그 어휘와 키워드 매핑
//!
//! 선언 순서가 곧 키워드 폴백의 탐색 순서입니다.

use std::fmt;

use serde::Serialize;
use utoipa::ToSchema;

/// 티켓 분류 태그 (12개 고정)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Tag {
    Internet,
    Account,
    Payment,
    Technical,
    Login,
    Error,
    Server,
    Website,
    Reset,
    Password,
    Connectivity,
    Crash,
}

/// 전체 어휘, 선언 순서
pub const ALL_TAGS: [Tag; 12] = [
    Tag::Internet,
    Tag::Account,
    Tag::Payment,
    Tag::Technical,
    Tag::Login,
    Tag::Error,
    Tag::Server,
    Tag::Website,
    Tag::Reset,
    Tag::Password,
    Tag::Connectivity,
    Tag::Crash,
];

impl Tag {
    pub fn as_str(self) -> &'static str {
        match self {
            Tag::Internet => "internet",
            Tag::Account => "account",
            Tag::Payment => "payment",
            Tag::Technical => "technical",
            Tag::Login => "login",
            Tag::Error => "error",
            Tag::Server => "server",
            Tag::Website => "website",
            Tag::Reset => "reset",
            Tag::Password => "password",
            Tag::Connectivity => "connectivity",
            Tag::Crash => "crash",
        }
    }

    /// 어휘에 있는 태그면 반환. 입력은 이미 소문자여야 함
    pub fn parse(candidate: &str) -> Option<Tag> {
        ALL_TAGS.iter().copied().find(|tag| tag.as_str() == candidate)
    }

    /// 이 태그를 암시하는 부분 문자열 목록 (소문자)
    pub fn keywords(self) -> &'static [&'static str] {
        match self {
            Tag::Internet => &["internet", "connection", "wifi", "network"],
            Tag::Account => &["account", "profile", "user"],
            Tag::Payment => &["payment", "billing", "charge", "transaction"],
            Tag::Technical => &["technical", "issue", "problem", "not working"],
            Tag::Login => &["login", "log in", "sign in", "access"],
            Tag::Error => &["error", "crash", "failed", "issue"],
            Tag::Server => &["server", "500", "down"],
            Tag::Website => &["website", "site", "page"],
            Tag::Reset => &["reset", "password", "recover"],
            Tag::Password => &["password", "pass"],
            Tag::Connectivity => &["connectivity", "connection", "internet"],
            Tag::Crash => &["crash", "crashes", "crashing"],
        }
    }

    /// 소문자화된 티켓 본문에 키워드 중 하나라도 포함되면 true
    pub fn matches(self, lowered_text: &str) -> bool {
        self.keywords()
            .iter()
            .any(|keyword| lowered_text.contains(keyword))
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 프롬프트에 들어가는 어휘 문자열 (`"internet, account, ..."`)
pub fn vocabulary_list() -> String {
    ALL_TAGS
        .iter()
        .map(|tag| tag.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vocabulary_has_twelve_unique_lowercase_tags() {
        let mut names: Vec<&str> = ALL_TAGS.iter().map(|t| t.as_str()).collect();
        assert!(names.iter().all(|n| n.chars().all(|c| c.is_ascii_lowercase())));
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), 12);
    }

    #[test]
    fn parse_round_trips_every_tag() {
        for tag in ALL_TAGS {
            assert_eq!(Tag::parse(tag.as_str()), Some(tag));
        }
    }

    #[test]
    fn parse_rejects_non_members() {
        assert_eq!(Tag::parse("issue"), None);
        assert_eq!(Tag::parse("Login"), None);
        assert_eq!(Tag::parse(""), None);
    }

    #[test]
    fn vocabulary_list_keeps_declaration_order() {
        assert_eq!(
            vocabulary_list(),
            "internet, account, payment, technical, login, error, server, website, reset, password, connectivity, crash"
        );
    }

    #[test]
    fn matches_uses_substrings() {
        assert!(Tag::Crash.matches("website keeps crashing"));
        assert!(Tag::Server.matches("error 500"));
        assert!(Tag::Password.matches("passphrase"));
        assert!(!Tag::Payment.matches("my wifi is down"));
    }
}
