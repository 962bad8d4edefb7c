use std::str::FromStr;

/// Identifier of every user-facing message the quote endpoint can return.
///
/// Each variant maps to exactly one field of [`LanguageStrings`], so a locale
/// table that forgets a message does not compile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKey {
    MethodNotAllowed,
    InvalidName,
    InvalidPhone,
    InvalidArea,
    InvalidService,
    InvalidMessage,
    PrepareFailed,
    SaveFailed,
    Success,
    GenericError,
    SchemaFailed,
    SetupFailed,
}

impl MessageKey {
    /// Every key, in declaration order.
    pub const ALL: [MessageKey; 12] = [
        MessageKey::MethodNotAllowed,
        MessageKey::InvalidName,
        MessageKey::InvalidPhone,
        MessageKey::InvalidArea,
        MessageKey::InvalidService,
        MessageKey::InvalidMessage,
        MessageKey::PrepareFailed,
        MessageKey::SaveFailed,
        MessageKey::Success,
        MessageKey::GenericError,
        MessageKey::SchemaFailed,
        MessageKey::SetupFailed,
    ];

    /// Stable snake_case name, as used by the website scripts.
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageKey::MethodNotAllowed => "method_not_allowed",
            MessageKey::InvalidName => "invalid_name",
            MessageKey::InvalidPhone => "invalid_phone",
            MessageKey::InvalidArea => "invalid_area",
            MessageKey::InvalidService => "invalid_service",
            MessageKey::InvalidMessage => "invalid_message",
            MessageKey::PrepareFailed => "prepare_failed",
            MessageKey::SaveFailed => "save_failed",
            MessageKey::Success => "success",
            MessageKey::GenericError => "generic_error",
            MessageKey::SchemaFailed => "schema_failed",
            MessageKey::SetupFailed => "setup_failed",
        }
    }
}

impl FromStr for MessageKey {
    type Err = anyhow::Error;

    fn from_str(key: &str) -> Result<Self, Self::Err> {
        MessageKey::ALL
            .into_iter()
            .find(|candidate| candidate.as_str() == key)
            .ok_or_else(|| anyhow::anyhow!("Unknown message key: '{}'", key))
    }
}

/// All localized user-facing strings for a language
///
/// Strings are plain UTF-8; JSON encoding leaves them unescaped.
#[derive(Debug, Clone)]
pub struct LanguageStrings {
    // ==================== Request Errors ====================
    /// Returned for anything other than POST
    pub method_not_allowed: &'static str,

    // ==================== Field Validation ====================
    pub invalid_name: &'static str,
    pub invalid_phone: &'static str,
    pub invalid_area: &'static str,
    pub invalid_service: &'static str,
    pub invalid_message: &'static str,

    // ==================== Storage Failures ====================
    pub prepare_failed: &'static str,
    pub save_failed: &'static str,
    pub schema_failed: &'static str,
    pub setup_failed: &'static str,

    // ==================== Outcome ====================
    /// Shown once the quote request row has been inserted
    pub success: &'static str,

    /// Catch-all shown for unavailable storage and unexpected failures
    pub generic_error: &'static str,
}

impl LanguageStrings {
    /// Look up the message for a key.
    pub fn get(&self, key: MessageKey) -> &'static str {
        match key {
            MessageKey::MethodNotAllowed => self.method_not_allowed,
            MessageKey::InvalidName => self.invalid_name,
            MessageKey::InvalidPhone => self.invalid_phone,
            MessageKey::InvalidArea => self.invalid_area,
            MessageKey::InvalidService => self.invalid_service,
            MessageKey::InvalidMessage => self.invalid_message,
            MessageKey::PrepareFailed => self.prepare_failed,
            MessageKey::SaveFailed => self.save_failed,
            MessageKey::Success => self.success,
            MessageKey::GenericError => self.generic_error,
            MessageKey::SchemaFailed => self.schema_failed,
            MessageKey::SetupFailed => self.setup_failed,
        }
    }

    /// Keys whose message is empty. Used by the startup check.
    pub fn missing_keys(&self) -> Vec<MessageKey> {
        MessageKey::ALL
            .into_iter()
            .filter(|key| self.get(*key).trim().is_empty())
            .collect()
    }
}

// ==================== English Strings ====================

/// English language strings (canonical)
pub static ENGLISH_STRINGS: LanguageStrings = LanguageStrings {
    method_not_allowed: "Only POST requests are allowed.",

    invalid_name: "Please enter your full name using letters only.",
    invalid_phone: "Enter a valid phone or WhatsApp number (e.g., +966 50 420 2782).",
    invalid_area: "Specify the Riyadh district or neighborhood for your project.",
    invalid_service: "Select the service type that best matches your request.",
    invalid_message: "Share more project details so we can prepare your quote.",

    prepare_failed: "Database error (prepare failed).",
    save_failed: "Could not save your request. Please try again later.",
    schema_failed: "Could not prepare the storage table. Please try again later.",
    setup_failed: "Failed to initialize the database. Please try again later.",

    success: "Thank you, your request has been received. We will contact you soon.",
    generic_error: "An unexpected error occurred. Please try again later.",
};

// ==================== Arabic Strings ====================

/// Arabic language strings
pub static ARABIC_STRINGS: LanguageStrings = LanguageStrings {
    method_not_allowed: "يُسمح فقط بطلبات POST.",

    invalid_name: "يرجى إدخال اسمك الكامل باستخدام أحرف فقط.",
    invalid_phone: "أدخل رقم هاتف أو واتساب صالح (مثال: +966 50 420 2782).",
    invalid_area: "اذكر الحي أو المنطقة في الرياض الخاصة بالمشروع.",
    invalid_service: "اختر نوع الخدمة المناسبة لطلبك.",
    invalid_message: "شارك المزيد من تفاصيل المشروع حتى نتمكن من تجهيز العرض.",

    prepare_failed: "حدث خطأ في قاعدة البيانات (فشل التحضير).",
    save_failed: "تعذر حفظ طلبك، يرجى المحاولة لاحقاً.",
    schema_failed: "تعذر تجهيز جدول التخزين. يرجى المحاولة لاحقًا.",
    setup_failed: "فشل تجهيز قاعدة البيانات. حاول مرة أخرى لاحقًا.",

    success: "شكرًا لك، تم استلام طلبك وسنتواصل معك قريبًا.",
    generic_error: "حدث خطأ غير متوقع، حاول مرة أخرى لاحقًا.",
};
