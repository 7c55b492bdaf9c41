//! Scripts installed before any page script runs.
//!
//! These only hide the automation flag and fill in properties a headless
//! build leaves empty. Challenge pages (CAPTCHAs, login walls) are detected
//! and reported elsewhere, never solved.

/// Readiness probe used by the DOM-ready navigation fallback.
pub const WAIT_FOR_READY_SCRIPT: &str = r#"
    new Promise((resolve) => {
        if (document.readyState === 'complete' || document.readyState === 'interactive') {
            resolve(document.readyState);
        } else {
            document.addEventListener('DOMContentLoaded', () => resolve(document.readyState));
        }
    })
"#;

const HIDE_WEBDRIVER: &str = r#"
    Object.defineProperty(navigator, 'webdriver', {
        get: () => undefined,
        configurable: true
    });
"#;

const CHROME_RUNTIME: &str = r#"
    if (!window.chrome) {
        window.chrome = { runtime: {}, loadTimes: function() {}, csi: function() {}, app: {} };
    }
"#;

/// `["en-US", "en"]` for `en-US`; a bare language yields a single entry.
pub fn navigator_languages(locale: &str) -> Vec<String> {
    let locale = locale.trim();
    let mut languages = vec![locale.to_string()];
    if let Some((base, _)) = locale.split_once('-') {
        if !base.is_empty() {
            languages.push(base.to_string());
        }
    }
    languages
}

/// Combined on-new-document script for a session.
pub fn stealth_script(locale: &str) -> String {
    let languages = serde_json::to_string(&navigator_languages(locale))
        .unwrap_or_else(|_| "[\"en-US\", \"en\"]".to_string());
    let languages_override = format!(
        "Object.defineProperty(navigator, 'languages', {{ get: () => {}, configurable: true }});",
        languages
    );

    [HIDE_WEBDRIVER, CHROME_RUNTIME, languages_override.as_str()].join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_navigator_languages() {
        assert_eq!(navigator_languages("en-US"), vec!["en-US", "en"]);
        assert_eq!(navigator_languages("pl"), vec!["pl"]);
    }

    #[test]
    fn test_stealth_script_embeds_locale() {
        let script = stealth_script("de-DE");
        assert!(script.contains("'webdriver'"));
        assert!(script.contains(r#"["de-DE","de"]"#));
    }
}
