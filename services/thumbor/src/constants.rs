// Env values used to configure thumbor urls.
pub const THUMBOR_ENDPOINT: &str = "THUMBOR_ENDPOINT";
pub const THUMBOR_SECURITY_KEY: &str = "THUMBOR_SECURITY_KEY";

// Token placed in the url when no security key is configured.
pub const UNSAFE_TOKEN: &str = "unsafe";

pub const FILTERS_PREFIX: &str = "/filters:";

// Values accepted by `Adjustments::validate`.
pub const FIT_MODES: &[&str] = &[
    "fit-in",
    "adaptive-fit-in",
    "full-fit-in",
    "adaptive-full-fit-in",
];
pub const HALIGN_VALUES: &[&str] = &["left", "center", "right"];
pub const VALIGN_VALUES: &[&str] = &["top", "middle", "bottom"];
