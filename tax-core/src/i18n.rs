//! English, Sinhala and Tamil strings for the filing wizard.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unsupported language '{0}' (expected en, si or ta)")]
pub struct UnsupportedLanguage(pub String);

/// Display language, serialized as its ISO 639-1 code.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    #[default]
    #[serde(rename = "en")]
    English,
    #[serde(rename = "si")]
    Sinhala,
    #[serde(rename = "ta")]
    Tamil,
}

impl Language {
    pub fn all() -> &'static [Language] {
        &[Language::English, Language::Sinhala, Language::Tamil]
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::English => "en",
            Self::Sinhala => "si",
            Self::Tamil => "ta",
        }
    }

    /// Short label shown on the language toggle.
    pub fn label(&self) -> &'static str {
        match self {
            Self::English => "EN",
            Self::Sinhala => "SI",
            Self::Tamil => "TA",
        }
    }

    /// Toggle order: EN → SI → TA → EN.
    pub fn next(&self) -> Language {
        match self {
            Self::English => Self::Sinhala,
            Self::Sinhala => Self::Tamil,
            Self::Tamil => Self::English,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = UnsupportedLanguage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" | "english" => Ok(Self::English),
            "si" | "sinhala" => Ok(Self::Sinhala),
            "ta" | "tamil" => Ok(Self::Tamil),
            _ => Err(UnsupportedLanguage(s.to_string())),
        }
    }
}

/// Every translatable string in the wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Message {
    StepIndicator,
    Step1Title,
    Step1Desc,
    LabelName,
    LabelTin,
    LabelEmail,
    LabelIncome,
    Step2Title,
    Step2Desc,
    SourceEmployment,
    SourceBusiness,
    SourceInvestment,
    SourceRental,
    SourceOther,
    Step3Title,
    Step3Desc,
    TaxSummary,
    TaxLiability,
    TotalIncome,
    TaxFreeAllowance,
    TaxableIncome,
    MonthlyTax,
    EffectiveRate,
    Step5Title,
    Step5Desc,
    ButtonBack,
    ButtonNext,
    ButtonSubmit,
    ErrRequired,
    ErrInvalidTin,
    ErrInvalidEmail,
    ErrInvalidIncome,
    ErrMinValue,
}

impl Message {
    /// Stable key used by stored data and external tooling.
    pub fn key(&self) -> &'static str {
        match self {
            Self::StepIndicator => "step_indicator",
            Self::Step1Title => "step1_title",
            Self::Step1Desc => "step1_desc",
            Self::LabelName => "lbl_name",
            Self::LabelTin => "lbl_tin",
            Self::LabelEmail => "lbl_email",
            Self::LabelIncome => "lbl_income",
            Self::Step2Title => "step2_title",
            Self::Step2Desc => "step2_desc",
            Self::SourceEmployment => "step_employment",
            Self::SourceBusiness => "step_business",
            Self::SourceInvestment => "step_investment",
            Self::SourceRental => "step_rental",
            Self::SourceOther => "step_other",
            Self::Step3Title => "step3_title",
            Self::Step3Desc => "step3_desc",
            Self::TaxSummary => "tax_summary",
            Self::TaxLiability => "tax_liability",
            Self::TotalIncome => "total_income",
            Self::TaxFreeAllowance => "tax_free_allowance",
            Self::TaxableIncome => "taxable_income",
            Self::MonthlyTax => "monthly_tax",
            Self::EffectiveRate => "effective_rate",
            Self::Step5Title => "step5_title",
            Self::Step5Desc => "step5_desc",
            Self::ButtonBack => "btn_back",
            Self::ButtonNext => "btn_next",
            Self::ButtonSubmit => "btn_submit",
            Self::ErrRequired => "err_required",
            Self::ErrInvalidTin => "err_invalid_tin",
            Self::ErrInvalidEmail => "err_invalid_email",
            Self::ErrInvalidIncome => "err_invalid_income",
            Self::ErrMinValue => "err_min_value",
        }
    }

    pub fn all() -> &'static [Message] {
        use Message::*;
        &[
            StepIndicator,
            Step1Title,
            Step1Desc,
            LabelName,
            LabelTin,
            LabelEmail,
            LabelIncome,
            Step2Title,
            Step2Desc,
            SourceEmployment,
            SourceBusiness,
            SourceInvestment,
            SourceRental,
            SourceOther,
            Step3Title,
            Step3Desc,
            TaxSummary,
            TaxLiability,
            TotalIncome,
            TaxFreeAllowance,
            TaxableIncome,
            MonthlyTax,
            EffectiveRate,
            Step5Title,
            Step5Desc,
            ButtonBack,
            ButtonNext,
            ButtonSubmit,
            ErrRequired,
            ErrInvalidTin,
            ErrInvalidEmail,
            ErrInvalidIncome,
            ErrMinValue,
        ]
    }

    pub fn from_key(key: &str) -> Option<Message> {
        Message::all().iter().copied().find(|m| m.key() == key)
    }
}

/// Looks up the text for `message` in `language`.
pub fn t(
    message: Message,
    language: Language,
) -> &'static str {
    use Language::{English as En, Sinhala as Si, Tamil as Ta};
    use Message::*;

    match (message, language) {
        (StepIndicator, En) => "Step {current} of {total}",
        (StepIndicator, Si) => "පියවර {current} / {total}",
        (StepIndicator, Ta) => "படி {current} / {total}",

        (Step1Title, En) => "Personal Details",
        (Step1Title, Si) => "පුද්ගලික විස්තර",
        (Step1Title, Ta) => "தனிப்பட்ட விவரங்கள்",

        (Step1Desc, En) => "Tell us a little about yourself to get started.",
        (Step1Desc, Si) => "ආරම්භ කිරීමට ඔබ ගැන කෙටියෙන් අපට කියන්න.",
        (Step1Desc, Ta) => "தொடங்க உங்களைப் பற்றி சுருக்கமாகச் சொல்லுங்கள்.",

        (LabelName, En) => "Full Name",
        (LabelName, Si) => "සම්පූර්ණ නම",
        (LabelName, Ta) => "முழு பெயர்",

        (LabelTin, En) => "Taxpayer Identification Number (TIN)",
        (LabelTin, Si) => "බදු ගෙවන්නාගේ හඳුනාගැනීමේ අංකය (TIN)",
        (LabelTin, Ta) => "வரி செலுத்துவோர் அடையாள எண் (TIN)",

        (LabelEmail, En) => "Email Address",
        (LabelEmail, Si) => "විද්‍යුත් තැපැල් ලිපිනය",
        (LabelEmail, Ta) => "மின்னஞ்சல் முகவரி",

        (LabelIncome, En) => "Annual Income (LKR)",
        (LabelIncome, Si) => "වාර්ෂික ආදායම (රු.)",
        (LabelIncome, Ta) => "ஆண்டு வருமானம் (ரூ.)",

        (Step2Title, En) => "Income Sources",
        (Step2Title, Si) => "ආදායම් මාර්ග",
        (Step2Title, Ta) => "வருமான மூலங்கள்",

        (Step2Desc, En) => "Select all sources of income you received during the tax year.",
        (Step2Desc, Si) => "බදු වර්ෂය තුළ ඔබට ලැබුණු සියලුම ආදායම් මාර්ග තෝරන්න.",
        (Step2Desc, Ta) => "வரி ஆண்டில் நீங்கள் பெற்ற அனைத்து வருமான மூலங்களையும் தேர்ந்தெடுக்கவும்.",

        (SourceEmployment, En) => "Employment",
        (SourceEmployment, Si) => "රැකියාව",
        (SourceEmployment, Ta) => "வேலைவாய்ப்பு",

        (SourceBusiness, En) => "Business",
        (SourceBusiness, Si) => "ව්‍යාපාරය",
        (SourceBusiness, Ta) => "வணிகம்",

        (SourceInvestment, En) => "Investment",
        (SourceInvestment, Si) => "ආයෝජන",
        (SourceInvestment, Ta) => "முதலீடு",

        (SourceRental, En) => "Rental",
        (SourceRental, Si) => "කුලී ආදායම",
        (SourceRental, Ta) => "வாடகை",

        (SourceOther, En) => "Other",
        (SourceOther, Si) => "වෙනත්",
        (SourceOther, Ta) => "மற்றவை",

        (Step3Title, En) => "Document Collection",
        (Step3Title, Si) => "ලේඛන එකතු කිරීම",
        (Step3Title, Ta) => "ஆவண சேகரிப்பு",

        (Step3Desc, En) => "Based on your profile, you need the following documents.",
        (Step3Desc, Si) => "ඔබේ තොරතුරු අනුව, ඔබට පහත ලේඛන අවශ්‍ය වේ.",
        (Step3Desc, Ta) => "உங்கள் விவரங்களின்படி, பின்வரும் ஆவணங்கள் தேவை.",

        (TaxSummary, En) => "Tax Summary",
        (TaxSummary, Si) => "බදු සාරාංශය",
        (TaxSummary, Ta) => "வரி சுருக்கம்",

        (TaxLiability, En) => "Estimated Tax Liability",
        (TaxLiability, Si) => "ඇස්තමේන්තුගත බදු වගකීම",
        (TaxLiability, Ta) => "மதிப்பிடப்பட்ட வரிப் பொறுப்பு",

        (TotalIncome, En) => "Total Annual Income",
        (TotalIncome, Si) => "මුළු වාර්ෂික ආදායම",
        (TotalIncome, Ta) => "மொத்த ஆண்டு வருமானம்",

        (TaxFreeAllowance, En) => "Tax-Free Allowance",
        (TaxFreeAllowance, Si) => "බදු රහිත දීමනාව",
        (TaxFreeAllowance, Ta) => "வரி விலக்கு வரம்பு",

        (TaxableIncome, En) => "Taxable Income",
        (TaxableIncome, Si) => "බදු අය කළ හැකි ආදායම",
        (TaxableIncome, Ta) => "வரி விதிக்கப்படும் வருமானம்",

        (MonthlyTax, En) => "Monthly Tax",
        (MonthlyTax, Si) => "මාසික බද්ද",
        (MonthlyTax, Ta) => "மாதாந்த வரி",

        (EffectiveRate, En) => "Effective Rate",
        (EffectiveRate, Si) => "සඵල බදු අනුපාතය",
        (EffectiveRate, Ta) => "பயனுள்ள வரி விகிதம்",

        (Step5Title, En) => "Ready to File!",
        (Step5Title, Si) => "ගොනු කිරීමට සූදානම්!",
        (Step5Title, Ta) => "தாக்கல் செய்யத் தயார்!",

        (Step5Desc, En) => "You have all the information needed to submit your return.",
        (Step5Desc, Si) => "ඔබේ බදු වාර්තාව ඉදිරිපත් කිරීමට අවශ්‍ය සියලු තොරතුරු ඔබ සතුව ඇත.",
        (Step5Desc, Ta) => "உங்கள் வருமான அறிக்கையைச் சமர்ப்பிக்கத் தேவையான அனைத்துத் தகவல்களும் உங்களிடம் உள்ளன.",

        (ButtonBack, En) => "Back",
        (ButtonBack, Si) => "ආපසු",
        (ButtonBack, Ta) => "பின்செல்",

        (ButtonNext, En) => "Next",
        (ButtonNext, Si) => "ඊළඟ",
        (ButtonNext, Ta) => "அடுத்து",

        (ButtonSubmit, En) => "Finish",
        (ButtonSubmit, Si) => "අවසන් කරන්න",
        (ButtonSubmit, Ta) => "முடிக்கவும்",

        (ErrRequired, En) => "This field is required",
        (ErrRequired, Si) => "මෙම ක්ෂේත්‍රය අවශ්‍යයි",
        (ErrRequired, Ta) => "இந்தப் புலம் தேவை",

        (ErrInvalidTin, En) => "TIN must contain exactly 9 digits",
        (ErrInvalidTin, Si) => "TIN අංකයේ ඉලක්කම් 9ක් තිබිය යුතුය",
        (ErrInvalidTin, Ta) => "TIN சரியாக 9 இலக்கங்களைக் கொண்டிருக்க வேண்டும்",

        (ErrInvalidEmail, En) => "Please enter a valid email address",
        (ErrInvalidEmail, Si) => "කරුණාකර වලංගු විද්‍යුත් තැපැල් ලිපිනයක් ඇතුළත් කරන්න",
        (ErrInvalidEmail, Ta) => "சரியான மின்னஞ்சல் முகவரியை உள்ளிடவும்",

        (ErrInvalidIncome, En) => "Please enter a valid, non-negative amount",
        (ErrInvalidIncome, Si) => "කරුණාකර වලංගු, සෘණ නොවන මුදලක් ඇතුළත් කරන්න",
        (ErrInvalidIncome, Ta) => "சரியான, எதிர்மறையற்ற தொகையை உள்ளிடவும்",

        (ErrMinValue, En) => "Value must be at least {min}",
        (ErrMinValue, Si) => "අගය අවම වශයෙන් {min} විය යුතුය",
        (ErrMinValue, Ta) => "மதிப்பு குறைந்தது {min} ஆக இருக்க வேண்டும்",
    }
}

/// Looks up a message by its string key, falling back to the key itself.
pub fn t_key(
    key: &str,
    language: Language,
) -> String {
    Message::from_key(key)
        .map(|message| t(message, language).to_string())
        .unwrap_or_else(|| key.to_string())
}

/// Localized "Step 2 of 5" style indicator.
pub fn step_indicator(
    current: u8,
    total: u8,
    language: Language,
) -> String {
    t(Message::StepIndicator, language)
        .replace("{current}", &current.to_string())
        .replace("{total}", &total.to_string())
}

/// Localized minimum-value error with the bound filled in.
pub fn min_value_error(
    min: impl fmt::Display,
    language: Language,
) -> String {
    t(Message::ErrMinValue, language).replace("{min}", &min.to_string())
}
