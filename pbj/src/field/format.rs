//! Well-known string formats.

use crate::utils::parse_iso8601;
use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};
use std::sync::LazyLock;
use uuid::Uuid;

static SLUG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9-]+$").expect("slug pattern compiles"));

static DATED_SLUG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{4}/(0[1-9]|1[0-2])/(0[1-9]|[12]\d|3[01])/[a-z0-9-]+$")
        .expect("dated slug pattern compiles")
});

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9.\-]+\.[A-Za-z]{2,}$").expect("email pattern compiles")
});

static HASHTAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_]{1,139}$").expect("hashtag pattern compiles"));

static HOSTNAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^([A-Za-z0-9]([A-Za-z0-9-]{0,61}[A-Za-z0-9])?\.)*[A-Za-z0-9]([A-Za-z0-9-]{0,61}[A-Za-z0-9])?$",
    )
    .expect("hostname pattern compiles")
});

static URI_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*:\S+$").expect("uri pattern compiles")
});

static URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https?://[^\s/$.?#][^\s]*$").expect("url pattern compiles")
});

/// A named string format checked on top of the kind guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Format {
    /// `YYYY-MM-DD`.
    Date,
    /// ISO-8601 date-time.
    DateTime,
    /// Lower-case words joined by dashes.
    Slug,
    /// `YYYY/MM/DD/slug`.
    DatedSlug,
    /// An email address.
    Email,
    /// A hashtag without the leading `#`.
    Hashtag,
    /// A DNS host name.
    Hostname,
    /// Dotted IPv4 address.
    Ipv4,
    /// IPv6 address.
    Ipv6,
    /// Hyphenated UUID.
    Uuid,
    /// Any absolute URI.
    Uri,
    /// An http(s) URL.
    Url,
}

impl Format {
    /// Whether `value` satisfies the format.
    #[must_use]
    pub fn is_valid(self, value: &str) -> bool {
        match self {
            Self::Date => NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok(),
            Self::DateTime => parse_iso8601(value).is_ok(),
            Self::Slug => SLUG_RE.is_match(value),
            Self::DatedSlug => DATED_SLUG_RE.is_match(value),
            Self::Email => EMAIL_RE.is_match(value),
            Self::Hashtag => HASHTAG_RE.is_match(value),
            Self::Hostname => value.len() <= 253 && HOSTNAME_RE.is_match(value),
            Self::Ipv4 => value.parse::<Ipv4Addr>().is_ok(),
            Self::Ipv6 => value.parse::<Ipv6Addr>().is_ok(),
            Self::Uuid => Uuid::parse_str(value).is_ok(),
            Self::Uri => URI_RE.is_match(value),
            Self::Url => URL_RE.is_match(value),
        }
    }

    /// The kebab-case name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::DateTime => "date-time",
            Self::Slug => "slug",
            Self::DatedSlug => "dated-slug",
            Self::Email => "email",
            Self::Hashtag => "hashtag",
            Self::Hostname => "hostname",
            Self::Ipv4 => "ipv4",
            Self::Ipv6 => "ipv6",
            Self::Uuid => "uuid",
            Self::Uri => "uri",
            Self::Url => "url",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
