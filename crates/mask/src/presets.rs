use serde::{Deserialize, Serialize};

/// Named mask patterns selectable from cell settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MaskPreset {
    #[serde(rename = "none")]
    None,
    #[serde(rename = "phoneUS")]
    PhoneUs,
    #[serde(rename = "phoneIntl")]
    PhoneIntl,
    #[serde(rename = "ssn")]
    Ssn,
    #[serde(rename = "creditCard")]
    CreditCard,
    #[serde(rename = "dateUS")]
    DateUs,
    #[serde(rename = "zipCode")]
    ZipCode,
    #[serde(rename = "time12h")]
    Time12h,
    #[serde(rename = "time24h")]
    Time24h,
}

impl MaskPreset {
    pub const ALL: [MaskPreset; 9] = [
        MaskPreset::None,
        MaskPreset::PhoneUs,
        MaskPreset::PhoneIntl,
        MaskPreset::Ssn,
        MaskPreset::CreditCard,
        MaskPreset::DateUs,
        MaskPreset::ZipCode,
        MaskPreset::Time12h,
        MaskPreset::Time24h,
    ];

    /// Settings key, e.g. `phoneUS`
    pub fn key(self) -> &'static str {
        match self {
            MaskPreset::None => "none",
            MaskPreset::PhoneUs => "phoneUS",
            MaskPreset::PhoneIntl => "phoneIntl",
            MaskPreset::Ssn => "ssn",
            MaskPreset::CreditCard => "creditCard",
            MaskPreset::DateUs => "dateUS",
            MaskPreset::ZipCode => "zipCode",
            MaskPreset::Time12h => "time12h",
            MaskPreset::Time24h => "time24h",
        }
    }

    /// Pattern for this preset; `None` for the explicit no-mask preset.
    pub fn pattern(self) -> Option<&'static str> {
        match self {
            MaskPreset::None => None,
            MaskPreset::PhoneUs | MaskPreset::PhoneIntl => Some("+0 (000) 000-0000"),
            MaskPreset::Ssn => Some("000-00-0000"),
            MaskPreset::CreditCard => Some("0000 0000 0000 0000"),
            MaskPreset::DateUs => Some("00/00/0000"),
            MaskPreset::ZipCode => Some("00000"),
            MaskPreset::Time12h => Some("00:00 AM"),
            MaskPreset::Time24h => Some("00:00"),
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.key() == key)
    }
}

/// Resolve a preset key to its pattern. Unknown keys mean no mask.
pub fn mask_from_preset(key: &str) -> Option<&'static str> {
    MaskPreset::from_key(key).and_then(MaskPreset::pattern)
}
