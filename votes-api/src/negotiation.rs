use votes_errors::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Html,
    /// Browsable API page.
    Api,
}

impl Format {
    /// Renderers in the order they are tried.
    pub const ALL: [Format; 3] = [Format::Json, Format::Html, Format::Api];

    pub fn media_type(self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::Html | Self::Api => "text/html",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Html => "html",
            Self::Api => "api",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.name() == name)
    }
}

#[derive(Debug, Clone, PartialEq)]
struct MediaRange {
    kind: String,
    subtype: String,
    /// Parameters other than `q`.
    params: Vec<(String, String)>,
    quality: f32,
}

impl MediaRange {
    fn parse(raw: &str) -> Option<Self> {
        let mut parts = raw.split(';');
        let (kind, subtype) = parts.next()?.trim().split_once('/')?;
        let (kind, subtype) = (kind.trim().to_ascii_lowercase(), subtype.trim().to_ascii_lowercase());
        if kind.is_empty() || subtype.is_empty() {
            return None;
        }

        let mut params = Vec::new();
        let mut quality = 1.0;
        for param in parts {
            let Some((key, value)) = param.split_once('=') else {
                continue;
            };
            let key = key.trim().to_ascii_lowercase();
            let value = value.trim().trim_matches('"').to_string();
            if key == "q" {
                quality = value.parse().unwrap_or(1.0);
            } else {
                params.push((key, value));
            }
        }

        Some(Self {
            kind,
            subtype,
            params,
            quality,
        })
    }

    /// Higher is more specific.
    fn precedence(&self) -> u8 {
        if self.kind == "*" {
            0
        } else if self.subtype == "*" {
            1
        } else if self.params.is_empty() {
            2
        } else {
            3
        }
    }

    /// Whether a renderer's parameterless media type satisfies this range.
    fn accepts(&self, media_type: &str) -> bool {
        let Some((kind, subtype)) = media_type.split_once('/') else {
            return false;
        };
        (self.kind == "*" || self.kind == kind) && (self.subtype == "*" || self.subtype == subtype)
    }
}

/// Picks a renderer from the `?format=` override or the `Accept` header. An
/// empty `format` is ignored.
///
/// Accept entries are grouped by specificity; within the most specific group
/// that anything matches, the earliest renderer wins. Quality values only
/// matter to exclude entries with `q=0`.
pub fn negotiate(format_param: Option<&str>, accept: Option<&str>) -> Result<Format, AppError> {
    if let Some(name) = format_param.filter(|name| !name.is_empty()) {
        return Format::from_name(name).ok_or(AppError::NotFound);
    }

    let accept = accept.map(str::trim).filter(|a| !a.is_empty()).unwrap_or("*/*");
    let ranges: Vec<MediaRange> = accept
        .split(',')
        .filter_map(MediaRange::parse)
        .filter(|range| range.quality > 0.0)
        .collect();

    for precedence in (0..=3).rev() {
        let group: Vec<&MediaRange> = ranges
            .iter()
            .filter(|range| range.precedence() == precedence)
            .collect();
        if let Some(format) = Format::ALL
            .into_iter()
            .find(|format| group.iter().any(|range| range.accepts(format.media_type())))
        {
            return Ok(format);
        }
    }

    Err(AppError::NotAcceptable)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BROWSER_ACCEPT: &str =
        "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,*/*;q=0.8";

    #[test]
    fn test_default_is_json() {
        assert_eq!(negotiate(None, None).unwrap(), Format::Json);
        assert_eq!(negotiate(None, Some("*/*")).unwrap(), Format::Json);
        assert_eq!(negotiate(None, Some("")).unwrap(), Format::Json);
    }

    #[test]
    fn test_browser_gets_html() {
        assert_eq!(negotiate(None, Some(BROWSER_ACCEPT)).unwrap(), Format::Html);
        assert_eq!(negotiate(None, Some("text/*")).unwrap(), Format::Html);
    }

    #[test]
    fn test_specific_type_beats_wildcard() {
        assert_eq!(
            negotiate(None, Some("*/*, text/html")).unwrap(),
            Format::Html
        );
        assert_eq!(
            negotiate(None, Some("text/html; charset=utf-8, application/json")).unwrap(),
            Format::Html
        );
    }

    #[test]
    fn test_priority_order_within_a_group() {
        assert_eq!(
            negotiate(None, Some("text/html, application/json")).unwrap(),
            Format::Json
        );
    }

    #[test]
    fn test_zero_quality_is_excluded() {
        assert_eq!(
            negotiate(None, Some("application/json;q=0, text/html")).unwrap(),
            Format::Html
        );
    }

    #[test]
    fn test_not_acceptable() {
        assert!(matches!(
            negotiate(None, Some("image/png")),
            Err(AppError::NotAcceptable)
        ));
    }

    #[test]
    fn test_format_override() {
        assert_eq!(negotiate(Some("api"), Some("application/json")).unwrap(), Format::Api);
        assert_eq!(negotiate(Some("html"), None).unwrap(), Format::Html);
        assert_eq!(negotiate(Some("json"), Some(BROWSER_ACCEPT)).unwrap(), Format::Json);
        assert!(matches!(negotiate(Some("xml"), None), Err(AppError::NotFound)));
    }

    #[test]
    fn test_empty_format_falls_back_to_accept() {
        assert_eq!(negotiate(Some(""), Some(BROWSER_ACCEPT)).unwrap(), Format::Html);
        assert_eq!(negotiate(Some(""), None).unwrap(), Format::Json);
    }

    #[test]
    fn test_media_range_parsing() {
        let range = MediaRange::parse(" Text/HTML ; level=1 ; q=0.5").unwrap();
        assert_eq!(range.kind, "text");
        assert_eq!(range.subtype, "html");
        assert_eq!(range.params, vec![("level".to_string(), "1".to_string())]);
        assert_eq!(range.quality, 0.5);
        assert_eq!(range.precedence(), 3);
        assert!(MediaRange::parse("garbage").is_none());
    }
}
