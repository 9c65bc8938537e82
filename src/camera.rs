//! Matching camera sections by title and rewriting their InitialZoom

use crate::ini::{ConfigDocument, Section};

pub const TITLE_KEY: &str = "Title";
pub const ZOOM_KEY: &str = "InitialZoom";

/// The camera to look for and the zoom it should end up with
#[derive(Debug, Clone, PartialEq)]
pub struct CameraTarget {
    pub title: String,
    pub zoom: f64,
}

impl CameraTarget {
    pub fn new(title: impl Into<String>, zoom: f64) -> Self {
        Self {
            title: title.into(),
            zoom,
        }
    }

    /// True if the section's Title is the target name, bare or double-quoted
    pub fn matches(&self, section: &Section) -> bool {
        match section.get(TITLE_KEY) {
            Some(title) => {
                title == self.title
                    || title
                        .strip_prefix('"')
                        .and_then(|t| t.strip_suffix('"'))
                        .is_some_and(|t| t == self.title)
            }
            None => false,
        }
    }

    pub fn zoom_text(&self) -> String {
        format_zoom(self.zoom)
    }
}

/// What happened to one title-matching section
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionChange {
    /// Section has no InitialZoom key; left alone
    MissingZoom { section: String },
    /// InitialZoom already has the target text
    AlreadySet { section: String, zoom: String },
    Updated {
        section: String,
        from: String,
        to: String,
    },
}

impl SectionChange {
    pub fn section(&self) -> &str {
        match self {
            SectionChange::MissingZoom { section }
            | SectionChange::AlreadySet { section, .. }
            | SectionChange::Updated { section, .. } => section,
        }
    }

    pub fn is_update(&self) -> bool {
        matches!(self, SectionChange::Updated { .. })
    }
}

/// Result of applying a [`CameraTarget`] to a document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModifyReport {
    /// One entry per title-matching section, in document order
    pub changes: Vec<SectionChange>,
    pub matched_any: bool,
}

impl ModifyReport {
    /// Names of the sections whose InitialZoom was rewritten
    pub fn modified_sections(&self) -> Vec<&str> {
        self.changes
            .iter()
            .filter(|c| c.is_update())
            .map(SectionChange::section)
            .collect()
    }

    pub fn is_modified(&self) -> bool {
        self.changes.iter().any(SectionChange::is_update)
    }
}

/// Rewrite InitialZoom in every section whose Title matches the target
pub fn apply(doc: &mut ConfigDocument, target: &CameraTarget) -> ModifyReport {
    let zoom = target.zoom_text();
    let mut report = ModifyReport::default();

    for section in doc.sections_mut() {
        if !target.matches(section) {
            continue;
        }
        report.matched_any = true;
        let name = section.name().to_string();

        let current = section.get(ZOOM_KEY).map(str::to_string);
        let change = match current {
            None => SectionChange::MissingZoom { section: name },
            // Textual comparison: "0.350" is not "0.35"
            Some(current) if current == zoom => SectionChange::AlreadySet {
                section: name,
                zoom: zoom.clone(),
            },
            Some(_) => {
                let from = section.set(ZOOM_KEY, zoom.clone()).unwrap_or_default();
                SectionChange::Updated {
                    section: name,
                    from,
                    to: zoom.clone(),
                }
            }
        };
        tracing::debug!(section = change.section(), ?change, "Evaluated camera section");
        report.changes.push(change);
    }

    report
}

/// Shortest round-trip decimal text for a float, in the style
/// `0.35`, `1.0`, `1e-05`, `1e+16`
pub fn format_zoom(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    // `{:e}` yields the shortest digits that round-trip, e.g. "-3.5e-1"
    let scientific = format!("{:e}", value);
    let (mantissa, exponent) = scientific
        .split_once('e')
        .unwrap_or((scientific.as_str(), "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);
    let (sign, mantissa) = match mantissa.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", mantissa),
    };
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();

    if (-4..16).contains(&exponent) {
        let body = if exponent >= 0 {
            let int_len = exponent as usize + 1;
            if digits.len() <= int_len {
                format!("{}{}.0", digits, "0".repeat(int_len - digits.len()))
            } else {
                format!("{}.{}", &digits[..int_len], &digits[int_len..])
            }
        } else {
            format!("0.{}{}", "0".repeat((-exponent - 1) as usize), digits)
        };
        format!("{sign}{body}")
    } else {
        let fraction = if digits.len() > 1 {
            format!(".{}", &digits[1..])
        } else {
            String::new()
        };
        let exp_sign = if exponent < 0 { '-' } else { '+' };
        format!(
            "{sign}{}{fraction}e{exp_sign}{:02}",
            &digits[..1],
            exponent.abs()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ini::IniParser;

    fn parse(text: &str) -> ConfigDocument {
        IniParser::new().parse(text).unwrap()
    }

    #[test]
    fn test_format_zoom() {
        assert_eq!(format_zoom(0.35), "0.35");
        assert_eq!(format_zoom(1.0), "1.0");
        assert_eq!(format_zoom(0.0), "0.0");
        assert_eq!(format_zoom(-0.5), "-0.5");
        assert_eq!(format_zoom(123.456), "123.456");
        assert_eq!(format_zoom(100.0), "100.0");
        assert_eq!(format_zoom(0.0001), "0.0001");
        assert_eq!(format_zoom(0.00001), "1e-05");
        assert_eq!(format_zoom(1.5e-7), "1.5e-07");
        assert_eq!(format_zoom(1e16), "1e+16");
        assert_eq!(format_zoom(1e15), "1000000000000000.0");
        assert_eq!(format_zoom(f64::INFINITY), "inf");
        assert_eq!(format_zoom(f64::NAN), "nan");
    }

    #[test]
    fn test_title_matches_bare_and_quoted() {
        let doc = parse("[A]\nTitle=Pilot\n[B]\nTitle=\"Pilot\"\n[C]\nTitle=Copilot\n[D]\nZoom=1\n");
        let target = CameraTarget::new("Pilot", 0.35);

        let matched: Vec<_> = doc
            .sections()
            .filter(|s| target.matches(s))
            .map(|s| s.name())
            .collect();
        assert_eq!(matched, vec!["A", "B"]);
    }

    #[test]
    fn test_title_match_is_case_sensitive() {
        let doc = parse("[A]\nTitle=pilot\n[B]\ntitle=Pilot\n");
        let target = CameraTarget::new("Pilot", 0.35);
        assert!(doc.sections().all(|s| !target.matches(s)));
    }

    #[test]
    fn test_apply_updates_zoom() {
        let mut doc = parse("[CAMERA_PILOT]\nTitle=Pilot\nInitialZoom=1.0\n");
        let report = apply(&mut doc, &CameraTarget::new("Pilot", 0.35));

        assert!(report.matched_any);
        assert!(report.is_modified());
        assert_eq!(report.modified_sections(), vec!["CAMERA_PILOT"]);
        assert_eq!(
            report.changes,
            vec![SectionChange::Updated {
                section: "CAMERA_PILOT".into(),
                from: "1.0".into(),
                to: "0.35".into(),
            }]
        );
        assert_eq!(
            doc.section("CAMERA_PILOT").unwrap().get("InitialZoom"),
            Some("0.35")
        );
    }

    #[test]
    fn test_apply_missing_zoom_is_skipped() {
        let mut doc = parse("[A]\nTitle=Pilot\n");
        let report = apply(&mut doc, &CameraTarget::new("Pilot", 0.35));

        assert!(report.matched_any);
        assert!(!report.is_modified());
        assert_eq!(
            report.changes,
            vec![SectionChange::MissingZoom { section: "A".into() }]
        );
        assert!(!doc.section("A").unwrap().contains_key("InitialZoom"));
    }

    #[test]
    fn test_apply_already_set() {
        let mut doc = parse("[A]\nTitle=Pilot\nInitialZoom=0.35\n");
        let report = apply(&mut doc, &CameraTarget::new("Pilot", 0.35));

        assert!(report.matched_any);
        assert!(!report.is_modified());
        assert!(matches!(report.changes[0], SectionChange::AlreadySet { .. }));
    }

    #[test]
    fn test_apply_formatting_difference_rewrites() {
        let mut doc = parse("[A]\nTitle=Pilot\nInitialZoom=0.350\n");
        let report = apply(&mut doc, &CameraTarget::new("Pilot", 0.35));

        assert!(report.is_modified());
        assert_eq!(doc.section("A").unwrap().get("InitialZoom"), Some("0.35"));
    }

    #[test]
    fn test_apply_no_match() {
        let mut doc = parse("[A]\nTitle=External\nInitialZoom=1.0\n");
        let before = doc.clone();
        let report = apply(&mut doc, &CameraTarget::new("Pilot", 0.35));

        assert!(!report.matched_any);
        assert!(report.changes.is_empty());
        assert_eq!(doc, before);
    }

    #[test]
    fn test_apply_multiple_sections() {
        let mut doc = parse(
            "[A]\nTitle=Pilot\nInitialZoom=1.0\n[B]\nTitle=\"Pilot\"\nInitialZoom=0.35\n[C]\nTitle=Pilot\nInitialZoom=0.6\n",
        );
        let report = apply(&mut doc, &CameraTarget::new("Pilot", 0.35));

        assert_eq!(report.changes.len(), 3);
        assert_eq!(report.modified_sections(), vec!["A", "C"]);
    }
}
