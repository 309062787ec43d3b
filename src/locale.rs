//! Display strings for the login screens in English and Hindi

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Supported display languages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Hi,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unsupported locale: {0} (expected en or hi)")]
pub struct UnknownLocale(pub String);

/// Named strings shown on the login screens
#[derive(Debug, PartialEq, Eq)]
pub struct LocaleStrings {
    pub app_name: &'static str,
    pub welcome: &'static str,
    pub enter_mobile: &'static str,
    pub subtitle: &'static str,
    pub phone_number: &'static str,
    pub mobile_number: &'static str,
    pub otp: &'static str,
    pub send_otp: &'static str,
    pub continue_label: &'static str,
    pub verify_otp: &'static str,
    pub loading: &'static str,
    pub consent_text: &'static str,
    pub change_number: &'static str,
}

static EN: LocaleStrings = LocaleStrings {
    app_name: "Meter Down",
    welcome: "Welcome to Meter Down",
    enter_mobile: "Enter your mobile number",
    subtitle: "Your trusted ride partner",
    phone_number: "Phone Number",
    mobile_number: "Mobile number",
    otp: "Enter OTP",
    send_otp: "Send OTP",
    continue_label: "Continue",
    verify_otp: "Verify OTP",
    loading: "Please wait...",
    consent_text: "By proceeding, you consent to get calls, WhatsApp or SMS/RCS messages, \
                   including by automated means, from Meter Down and its affiliates to the \
                   number provided.",
    change_number: "Change mobile number",
};

static HI: LocaleStrings = LocaleStrings {
    app_name: "मीटर डाउन",
    welcome: "मीटर डाउन में आपका स्वागत है",
    enter_mobile: "अपना मोबाइल नंबर दर्ज करें",
    subtitle: "आपका विश्वसनीय राइड पार्टनर",
    phone_number: "फोन नंबर",
    mobile_number: "मोबाइल नंबर",
    otp: "OTP दर्ज करें",
    send_otp: "OTP भेजें",
    continue_label: "जारी रखें",
    verify_otp: "OTP सत्यापित करें",
    loading: "कृपया प्रतीक्षा करें...",
    consent_text: "आगे बढ़कर, आप प्रदान किए गए नंबर पर मीटर डाउन और इसकी सहयोगी कंपनियों से कॉल, \
                   व्हाट्सऐप या SMS/RCS संदेश प्राप्त करने की सहमति देते हैं।",
    change_number: "मोबाइल नंबर बदलें",
};

impl Locale {
    pub const ALL: [Locale; 2] = [Locale::En, Locale::Hi];

    /// The other supported locale
    pub fn toggle(self) -> Self {
        match self {
            Self::En => Self::Hi,
            Self::Hi => Self::En,
        }
    }

    pub fn tag(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Hi => "hi",
        }
    }

    pub fn strings(self) -> &'static LocaleStrings {
        match self {
            Self::En => &EN,
            Self::Hi => &HI,
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Locale {
    type Err = UnknownLocale;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" => Ok(Self::En),
            "hi" => Ok(Self::Hi),
            other => Err(UnknownLocale(other.to_string())),
        }
    }
}
