//! User-agent classification into browser/platform counter codes
//!
//! This module parses a raw user-agent string into a browser family and a
//! platform family using fixed token tables, then maps both into the stable
//! two-part code (e.g. `saf-osx`) used as a dimension on several counters.
//!
//! Classification is pure and total: unparseable or empty input degrades to
//! `oth-otd` (or `oth-otm` when the agent looks mobile), never an error.

/// Supported browser families.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Browser {
    Firefox,
    Chrome,
    InternetExplorer,
    Safari,
    Android,
    BlackBerry,
    WebOs,
    Opera,
}

impl Browser {
    /// Stable counter code for this browser family
    pub fn code(self) -> &'static str {
        match self {
            Browser::Firefox => "fir",
            Browser::Chrome => "chr",
            Browser::InternetExplorer => "iex",
            Browser::Safari => "saf",
            Browser::Android => "and",
            Browser::BlackBerry => "rim",
            Browser::WebOs => "weo",
            Browser::Opera => "ope",
        }
    }
}

/// Supported platform families.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Windows,
    Macintosh,
    IPad,
    IPhone,
    IPod,
    Linux,
    Android,
    BlackBerry,
    WebOs,
    WindowsPhone,
}

impl Platform {
    /// Stable counter code for this platform family
    pub fn code(self) -> &'static str {
        match self {
            Platform::Windows => "win",
            Platform::Macintosh => "osx",
            Platform::IPad => "ipa",
            Platform::IPhone => "iph",
            Platform::IPod => "ipo",
            Platform::Linux => "lin",
            Platform::Android => "and",
            Platform::BlackBerry => "rim",
            Platform::WebOs => "weo",
            Platform::WindowsPhone => "wip",
        }
    }
}

// Ordered detection tables: first matching token wins, so more specific
// tokens must precede the generic ones they contain ("Windows Phone" before
// "Windows", "iPad" before "iPhone", "Android" before "Linux").
const BROWSER_TOKENS: &[(&str, Browser)] = &[
    ("Opera", Browser::Opera),
    ("MSIE", Browser::InternetExplorer),
    ("Chrome", Browser::Chrome),
    ("BlackBerry", Browser::BlackBerry),
    ("webOS", Browser::WebOs),
    ("Android", Browser::Android),
    ("Firefox", Browser::Firefox),
    ("Safari", Browser::Safari),
];

const PLATFORM_TOKENS: &[(&str, Platform)] = &[
    ("Windows Phone", Platform::WindowsPhone),
    ("Windows", Platform::Windows),
    ("iPad", Platform::IPad),
    ("iPod", Platform::IPod),
    ("iPhone", Platform::IPhone),
    ("Macintosh", Platform::Macintosh),
    ("BlackBerry", Platform::BlackBerry),
    ("webOS", Platform::WebOs),
    ("Android", Platform::Android),
    ("Linux", Platform::Linux),
    ("X11", Platform::Linux),
];

const MOBILE_HINTS: &[&str] = &[
    "Mobile",
    "Opera Mini",
    "IEMobile",
    "J2ME",
    "MIDP",
    "Symbian",
];

/// A parsed user-agent: browser family, platform family and a mobile flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserAgent {
    pub browser: Option<Browser>,
    pub platform: Option<Platform>,
    mobile: bool,
}

impl UserAgent {
    /// Parse a raw user-agent string. Never fails; unknown agents simply
    /// carry `None` for browser and/or platform.
    pub fn parse(user_agent: &str) -> Self {
        let browser = detect_browser(user_agent);
        let platform = detect_platform(user_agent);
        Self {
            browser,
            platform,
            mobile: detect_mobile(user_agent, platform),
        }
    }

    pub fn is_mobile(&self) -> bool {
        self.mobile
    }
}

fn detect_browser(user_agent: &str) -> Option<Browser> {
    // Opera Mini identifies itself inside an Opera product token but is a
    // distinct (untracked) browser family.
    if user_agent.contains("Opera Mini") {
        return None;
    }

    BROWSER_TOKENS
        .iter()
        .find(|(token, _)| user_agent.contains(token))
        .map(|&(_, browser)| browser)
}

fn detect_platform(user_agent: &str) -> Option<Platform> {
    PLATFORM_TOKENS
        .iter()
        .find(|(token, _)| user_agent.contains(token))
        .map(|&(_, platform)| platform)
}

fn detect_mobile(user_agent: &str, platform: Option<Platform>) -> bool {
    if matches!(
        platform,
        Some(
            Platform::IPad
                | Platform::IPhone
                | Platform::IPod
                | Platform::Android
                | Platform::BlackBerry
                | Platform::WebOs
                | Platform::WindowsPhone
        )
    ) {
        return true;
    }

    MOBILE_HINTS.iter().any(|hint| user_agent.contains(hint))
}

/// Derive the `<browser>-<platform>` counter code from a raw user-agent.
///
/// Unknown browsers map to `oth`; unknown platforms map to `otm` for mobile
/// agents and `otd` otherwise, so empty or unparseable input yields
/// `oth-otd`.
pub fn browser_and_platform_key(user_agent: &str) -> String {
    let agent = UserAgent::parse(user_agent);

    let browser = agent.browser.map_or("oth", Browser::code);
    let platform = agent.platform.map_or(
        if agent.is_mobile() { "otm" } else { "otd" },
        Platform::code,
    );

    format!("{browser}-{platform}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safari_on_mac() {
        let key = browser_and_platform_key(
            "Mozilla/5.0 (Macintosh; U; Intel Mac OS X 10_6_8; de-at) AppleWebKit/533.21.1 (KHTML, like Gecko) Version/5.0.5 Safari/533.21.1",
        );
        assert_eq!(key, "saf-osx");
    }

    #[test]
    fn test_firefox_on_linux() {
        let key = browser_and_platform_key(
            "Mozilla/5.0 (X11; U; Linux amd64; rv:5.0) Gecko/20100101 Firefox/5.0 (Debian)",
        );
        assert_eq!(key, "fir-lin");
    }

    #[test]
    fn test_internet_explorer_on_windows() {
        let key = browser_and_platform_key(
            "Mozilla/5.0 (compatible; MSIE 9.0; Windows NT 6.1; Win64; x64; Trident/5.0; .NET CLR 3.5.30729; .NET CLR 3.0.30729; .NET CLR 2.0.50727; Media Center PC 6.0)",
        );
        assert_eq!(key, "iex-win");
    }

    #[test]
    fn test_chrome_on_windows() {
        let key = browser_and_platform_key(
            "Mozilla/5.0 (Windows NT 5.1) AppleWebKit/535.1 (KHTML, like Gecko) Chrome/14.0.815.0 Safari/535.1",
        );
        assert_eq!(key, "chr-win");
    }

    #[test]
    fn test_android_stock_browser() {
        let key = browser_and_platform_key(
            "Mozilla/5.0 (Linux; U; Android 2.3.4; fr-fr; HTC Desire Build/GRJ22) AppleWebKit/533.1 (KHTML, like Gecko) Version/4.0 Mobile Safari/533.1",
        );
        assert_eq!(key, "and-and");
    }

    #[test]
    fn test_blackberry_webkit() {
        let key = browser_and_platform_key(
            "Mozilla/5.0 (BlackBerry; U; BlackBerry 9700; en-US) AppleWebKit/534.8+ (KHTML, like Gecko) Version/6.0.0.546 Mobile Safari/534.8+",
        );
        assert_eq!(key, "rim-rim");
    }

    #[test]
    fn test_blackberry_legacy() {
        let key = browser_and_platform_key(
            "BlackBerry9700/5.0.0.862 Profile/MIDP-2.1 Configuration/CLDC-1.1 VendorID/120",
        );
        assert_eq!(key, "rim-rim");
    }

    #[test]
    fn test_opera_on_linux() {
        let key = browser_and_platform_key(
            "Opera/9.80 (X11; Linux x86_64; U; Ubuntu/10.10 (maverick); pl) Presto/2.7.62 Version/11.01",
        );
        assert_eq!(key, "ope-lin");
    }

    #[test]
    fn test_webos() {
        let key = browser_and_platform_key(
            "Mozilla/5.0 (webOS/1.0; U; en-US) AppleWebKit/525.27.1 (KHTML, like Geko) Version/1.0 Safari/525.27.1 Pre/1.0",
        );
        assert_eq!(key, "weo-weo");
    }

    #[test]
    fn test_internet_explorer_on_windows_phone() {
        let key = browser_and_platform_key(
            "Mozilla/4.0 (compatible; MSIE 7.0; Windows Phone OS 7.0; Trident/3.1; IEMobile/7.0) Asus;Galaxy6",
        );
        assert_eq!(key, "iex-wip");
    }

    #[test]
    fn test_lynx_falls_through_to_other_desktop() {
        let key = browser_and_platform_key(
            "Lynx/2.8.7rel.2 libwww-FM/2.14 SSL-MM/1.4.1 OpenSSL/1.0.0a",
        );
        assert_eq!(key, "oth-otd");
    }

    #[test]
    fn test_firefox_on_maemo() {
        let key = browser_and_platform_key(
            "Mozilla/5.0 (X11; U; Linux armv7l; ru-RU; rv:1.9.2.3pre) Gecko/20100723 Firefox/3.5 Maemo Browser 1.7.4.8 RX-51 N900",
        );
        assert_eq!(key, "fir-lin");
    }

    #[test]
    fn test_opera_mini_is_other_mobile() {
        let key = browser_and_platform_key(
            "Opera/9.80 (J2ME/MIDP; Opera Mini/9.80 (J2ME/23.377; U; en) Presto/2.5.25 Version/10.54",
        );
        assert_eq!(key, "oth-otm");
    }

    #[test]
    fn test_safari_on_iphone() {
        let key = browser_and_platform_key(
            "Mozilla/5.0 (iPhone; U; CPU like Mac OS X; en) AppleWebKit/420+ (KHTML, like Gecko) Version/3.0 Mobile/1A543a Safari/419.3",
        );
        assert_eq!(key, "saf-iph");
    }

    #[test]
    fn test_safari_on_ipad() {
        let key = browser_and_platform_key(
            "Mozilla/5.0(iPad; U; CPU OS 4_3 like Mac OS X; en-us) AppleWebKit/533.17.9 (KHTML, like Gecko) Version/5.0.2 Mobile/8F191 Safari/6533.18.5",
        );
        assert_eq!(key, "saf-ipa");
    }

    #[test]
    fn test_ipad_beats_iphone_token() {
        // Early iPad agents carry "CPU iPhone OS"; the iPad token must win
        let key = browser_and_platform_key(
            "Mozilla/5.0(iPad; U; CPU iPhone OS 3_2 like Mac OS X; en-us) AppleWebKit/531.21.10 (KHTML, like Gecko) Version/4.0.4 Mobile/7B314 Safari/531.21.10",
        );
        assert_eq!(key, "saf-ipa");
    }

    #[test]
    fn test_safari_on_ipod() {
        let key = browser_and_platform_key(
            "Mozila/5.0 (iPod; U; CPU like Mac OS X; en) AppleWebKit/420.1 (KHTML, like Geckto) Version/3.0 Mobile/3A101a Safari/419.3",
        );
        assert_eq!(key, "saf-ipo");
    }

    #[test]
    fn test_unknown_agent() {
        assert_eq!(browser_and_platform_key("HotJava/1.1.2 FCS"), "oth-otd");
    }

    #[test]
    fn test_empty_agent() {
        assert_eq!(browser_and_platform_key(""), "oth-otd");
    }
}
