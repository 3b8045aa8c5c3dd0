//! Ordered substring heuristics for browser, OS and device family.
//!
//! Every rule list is scanned top to bottom and the first hit wins, so more
//! specific tokens sit above the ones they contain (Edge and Opera both
//! advertise "chrome/", Chrome advertises "safari/", Android advertises "linux").

use crate::enrichment::user_agent::DeviceType;

pub const UNKNOWN: &str = "Unknown";

struct BrowserRule {
    token: &'static str,
    family: &'static str,
    /// Read the version after this token instead of after `token`.
    version_token: Option<&'static str>,
}

const fn rule(token: &'static str, family: &'static str) -> BrowserRule {
    BrowserRule {
        token,
        family,
        version_token: None,
    }
}

const fn rule_versioned_by(
    token: &'static str,
    family: &'static str,
    version_token: &'static str,
) -> BrowserRule {
    BrowserRule {
        token,
        family,
        version_token: Some(version_token),
    }
}

const BROWSER_RULES: &[BrowserRule] = &[
    rule("edg/", "Edge"),
    rule("edga/", "Edge"),
    rule("edgios/", "Edge"),
    rule("opr/", "Opera"),
    rule("opera/", "Opera"),
    rule("samsungbrowser/", "Samsung Internet"),
    rule("yabrowser/", "Yandex Browser"),
    rule("vivaldi/", "Vivaldi"),
    rule("firefox/", "Firefox"),
    rule("fxios/", "Firefox"),
    rule("crios/", "Chrome"),
    rule("chrome/", "Chrome"),
    rule("msie ", "Internet Explorer"),
    rule_versioned_by("trident/", "Internet Explorer", "rv:"),
    rule_versioned_by("safari/", "Safari", "version/"),
    rule("curl/", "curl"),
    rule("wget/", "Wget"),
    rule("python-requests/", "Python Requests"),
    rule("go-http-client/", "Go HTTP Client"),
];

const WINDOWS_VERSIONS: &[(&str, &str)] = &[
    ("windows nt 10.0", "10"),
    ("windows nt 6.3", "8.1"),
    ("windows nt 6.2", "8"),
    ("windows nt 6.1", "7"),
    ("windows nt 6.0", "Vista"),
    ("windows nt 5.1", "XP"),
];

const LINUX_DISTRIBUTIONS: &[(&str, &str)] = &[
    ("ubuntu", "Ubuntu"),
    ("fedora", "Fedora"),
    ("debian", "Debian"),
    ("centos", "CentOS"),
    ("arch linux", "Arch Linux"),
    ("linux mint", "Linux Mint"),
    ("opensuse", "openSUSE"),
];

const TABLET_TOKENS: &[&str] = &["ipad", "tablet", "kindle", "silk/", "playbook"];
const MOBILE_TOKENS: &[&str] = &["mobi", "iphone", "ipod", "windows phone"];

/// Returns (family, version). `ua` must be lower-cased.
pub fn detect_browser(ua: &str) -> (String, String) {
    for rule in BROWSER_RULES {
        let Some(pos) = ua.find(rule.token) else {
            continue;
        };

        let version = match rule.version_token {
            Some(token) => version_after(ua, token),
            None => version_at(&ua[pos + rule.token.len()..]),
        };

        return (rule.family.to_string(), version);
    }

    (UNKNOWN.to_string(), String::new())
}

/// Returns (family, version). `ua` must be lower-cased.
pub fn detect_os(ua: &str) -> (String, String) {
    if ["iphone", "ipad", "ipod"].iter().any(|t| ua.contains(t)) {
        return ("iOS".to_string(), dotted(&version_after(ua, " os ")));
    }

    if ua.contains("android") {
        return ("Android".to_string(), version_after(ua, "android "));
    }

    if ua.contains("windows") {
        let version = WINDOWS_VERSIONS
            .iter()
            .find(|(token, _)| ua.contains(token))
            .map(|(_, version)| version.to_string())
            .unwrap_or_default();
        return ("Windows".to_string(), version);
    }

    if ua.contains("mac os x") || ua.contains("macintosh") {
        return ("macOS".to_string(), dotted(&version_after(ua, "mac os x ")));
    }

    if ua.contains("linux") {
        let family = LINUX_DISTRIBUTIONS
            .iter()
            .find(|(token, _)| ua.contains(token))
            .map(|(_, name)| *name)
            .unwrap_or("Linux");
        return (family.to_string(), String::new());
    }

    if let Some(pos) = ua.find("cros ") {
        // "cros x86_64 14541.0.0": skip the architecture word.
        let version = ua[pos + "cros ".len()..]
            .split_whitespace()
            .nth(1)
            .map(version_at)
            .unwrap_or_default();
        return ("ChromeOS".to_string(), version);
    }

    (UNKNOWN.to_string(), String::new())
}

/// `ua` must be lower-cased.
pub fn detect_device(ua: &str) -> DeviceType {
    let android_tablet = ua.contains("android") && !ua.contains("mobile");

    if android_tablet || TABLET_TOKENS.iter().any(|t| ua.contains(t)) {
        DeviceType::Tablet
    } else if MOBILE_TOKENS.iter().any(|t| ua.contains(t)) {
        DeviceType::Mobile
    } else {
        DeviceType::Desktop
    }
}

fn version_after(ua: &str, token: &str) -> String {
    ua.find(token)
        .map(|pos| version_at(&ua[pos + token.len()..]))
        .unwrap_or_default()
}

/// Leading run of digits, dots and underscores.
fn version_at(rest: &str) -> String {
    let end = rest
        .find(|c: char| !(c.is_ascii_digit() || c == '.' || c == '_'))
        .unwrap_or(rest.len());
    rest[..end].trim_end_matches(['.', '_']).to_string()
}

/// Apple writes versions with underscores ("10_15_7").
fn dotted(version: &str) -> String {
    version.replace('_', ".")
}
