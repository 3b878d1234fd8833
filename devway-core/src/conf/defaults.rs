use crate::conf::types::RuleSpec;

/// Backend path groups forwarded by default, in match order.
///
/// `/mavlink2rest` and `/mavlink-camera-manager` sit before `/mavlink` because
/// the patterns are unanchored on the right and the first match wins.
const DEFAULT_TABLE: &[(&str, Flags)] = &[
    ("/ardupilot-manager", Flags::PLAIN),
    ("/bag", Flags::PLAIN),
    ("/beacon", Flags::PLAIN),
    ("/bridget", Flags::PLAIN),
    ("/cable-guy", Flags::PLAIN),
    ("/commander", Flags::PLAIN),
    ("/docker", Flags::PLAIN),
    ("/file-browser", Flags::PLAIN),
    ("/helper", Flags::PLAIN),
    ("/kraken", Flags::PASSTHROUGH),
    ("/logviewer", Flags::PLAIN),
    ("/mavlink2rest", Flags::WEBSOCKET),
    ("/mavlink-camera-manager", Flags::PLAIN),
    ("/mavlink", Flags::WEBSOCKET),
    ("/nmea-injector", Flags::PLAIN),
    ("/network-test", Flags::PLAIN),
    ("/ping", Flags::PLAIN),
    ("/status", Flags::PLAIN),
    ("/system-information", Flags::PLAIN),
    ("/upload", Flags::PLAIN),
    ("/userdata", Flags::PLAIN),
    ("/version-chooser", Flags::PASSTHROUGH),
    ("/wifi-manager", Flags::PLAIN),
];

#[derive(Clone, Copy)]
struct Flags {
    change_origin: bool,
    websocket: bool,
    stream_passthrough: bool,
}

impl Flags {
    const PLAIN: Self = Self {
        change_origin: false,
        websocket: false,
        stream_passthrough: false,
    };

    const WEBSOCKET: Self = Self {
        change_origin: true,
        websocket: true,
        stream_passthrough: false,
    };

    const PASSTHROUGH: Self = Self {
        change_origin: false,
        websocket: false,
        stream_passthrough: true,
    };
}

/// The built-in rule table used when the configuration declares no rules.
pub fn default_rules() -> Vec<RuleSpec> {
    DEFAULT_TABLE
        .iter()
        .map(|(prefix, flags)| RuleSpec {
            name: Some(prefix.trim_start_matches('/').to_string()),
            pattern: format!("^{}", regex::escape(prefix)),
            change_origin: flags.change_origin,
            websocket: flags.websocket,
            stream_passthrough: flags.stream_passthrough,
        })
        .collect()
}
