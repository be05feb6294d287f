use serde::{Deserialize, Serialize};
use std::str::FromStr;
use url::Url;

use crate::error::AppError;

pub const DEFAULT_SHARE_TEXT: &str =
    "Check out Imam Yussuf Abdi for Salt Lake City Council District 1!";

/// Social platforms with a share button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShareTarget {
    Facebook,
    Twitter,
    LinkedIn,
    Email,
}

impl FromStr for ShareTarget {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "facebook" => Ok(ShareTarget::Facebook),
            "twitter" => Ok(ShareTarget::Twitter),
            "linkedin" => Ok(ShareTarget::LinkedIn),
            "email" => Ok(ShareTarget::Email),
            other => Err(AppError::Validation(format!("unknown share platform '{}'", other))),
        }
    }
}

/// Builds the share link for `page_url` on `target`.
pub fn share_url(target: ShareTarget, page_url: &str, text: &str) -> Result<Url, AppError> {
    // Reject garbage early; the page url is embedded as a parameter.
    let page = Url::parse(page_url)?;

    let url = match target {
        ShareTarget::Facebook => Url::parse_with_params(
            "https://www.facebook.com/sharer/sharer.php",
            &[("u", page.as_str())],
        )?,
        ShareTarget::Twitter => Url::parse_with_params(
            "https://twitter.com/intent/tweet",
            &[("url", page.as_str()), ("text", text)],
        )?,
        ShareTarget::LinkedIn => Url::parse_with_params(
            "https://www.linkedin.com/sharing/share-offsite/",
            &[("url", page.as_str())],
        )?,
        ShareTarget::Email => {
            Url::parse_with_params("mailto:", &[("subject", text), ("body", page.as_str())])?
        }
    };
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_twitter_link_encodes_parameters() {
        let url = share_url(
            ShareTarget::Twitter,
            "https://voteyussuf.com/#issues",
            DEFAULT_SHARE_TEXT,
        )
        .unwrap();

        assert_eq!(url.host_str(), Some("twitter.com"));
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(
            pairs,
            vec![
                ("url".to_string(), "https://voteyussuf.com/#issues".to_string()),
                ("text".to_string(), DEFAULT_SHARE_TEXT.to_string()),
            ]
        );
        assert!(!url.as_str().contains(' '));
    }

    #[test]
    fn test_email_link() {
        let url = share_url(ShareTarget::Email, "https://voteyussuf.com", "Vote!").unwrap();
        assert_eq!(url.scheme(), "mailto");
        assert!(url.as_str().starts_with("mailto:?subject=Vote%21"));
    }

    #[test]
    fn test_unknown_platform() {
        assert!("myspace".parse::<ShareTarget>().is_err());
        assert_eq!("LinkedIn".parse::<ShareTarget>().unwrap(), ShareTarget::LinkedIn);
    }

    #[test]
    fn test_bad_page_url() {
        assert!(share_url(ShareTarget::Facebook, "not a url", "x").is_err());
    }
}
