//! 语言数据表
//!
//! 字母、数字、标点、变音符号、阿拉伯连字与停用词。规则引擎只把它们当作
//! 查找表使用。

use std::collections::HashSet;

/// 零宽非连接符（ZWNJ）
pub const ZWNJ: char = '\u{200C}';

/// 阿拉伯延伸符（tatweel / kashida）
pub const TATWEEL: char = '\u{0640}';

pub const PERSIAN_LETTERS: &str = "آابپتثجچحخدذرزژسشصضطظعغفقکگلمنوهیءأؤئۀ";

pub const PERSIAN_DIGITS: &str = "۰۱۲۳۴۵۶۷۸۹";
pub const ARABIC_DIGITS: &str = "٠١٢٣٤٥٦٧٨٩";
pub const ENGLISH_DIGITS: &str = "0123456789";
pub const FULLWIDTH_DIGITS: &str = "０１２３４５６７８９";

pub const ENGLISH_LETTERS: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// 阿拉伯/波斯变音符号（harakat、tanwin、shadda、sukun、上标 alef）
pub const DIACRITICS: &str = "\u{064B}\u{064C}\u{064D}\u{064E}\u{064F}\u{0650}\u{0651}\u{0652}\u{0670}";

/// 句末标点
pub const SENTENCE_TERMINATORS: &str = ".!?؟…";

/// 波斯文本中保留的核心标点
pub const PERSIAN_PUNCTUATIONS: &str = "!\"'()*,-./:;?[]«»،؛؟…٪";

/// 标点过滤器移除的全部标点
pub const PUNCTUATIONS: &str =
    "!\"#$%&'()*+,-./:;<=>?@[\\]^_`{|}~«»،؛؟…٪٬٫“”‘’„‹›—–•·";

/// 所有数字（数字过滤器使用）
pub fn numbers() -> String {
    [PERSIAN_DIGITS, ARABIC_DIGITS, ENGLISH_DIGITS, FULLWIDTH_DIGITS].concat()
}

/// 字母统一映射：(变体集合, 标准字母)
///
/// `ۀ`、`ئ`、`أ`、`ؤ`、`ء` 属于合法波斯书写，不在映射内。
pub const ALPHABET_MAPPINGS: &[(&str, &str)] = &[
    ("كػڪګڬڭڮ", "ک"),
    ("يىێېۍۑٸ", "ی"),
    ("ةۃۿەھ", "ه"),
    ("إٱٲٳٵ", "ا"),
    ("ډڊڈڋڌڍڎڏڐ", "د"),
    ("ڕڑڒړڔږڗڙ", "ر"),
    ("ښڛڜ", "س"),
    ("ټٹٺٽٿ", "ت"),
    ("ڱڲڳڴ", "گ"),
    ("ٶۄۅۆۇۈۉۊۋۏ", "و"),
    ("ڹڻڼڽ", "ن"),
];

/// 标点统一映射
pub const PUNCTUATION_MAPPINGS: &[(&str, &str)] = &[
    ("?？", "؟"),
    (",٬，", "،"),
    (";；", "؛"),
    ("%٪％", "٪"),
    ("！❕❗", "!"),
    ("：", ":"),
    ("．", "."),
    ("“", "«"),
    ("”", "»"),
];

/// 阿拉伯连字与符号展开
pub const ARABIC_LIGATURES: &[(&str, &str)] = &[
    ("﷽", "بسم الله الرحمن الرحیم"),
    ("ﷲ", "الله"),
    ("ﷳ", "اکبر"),
    ("ﷴ", "محمد"),
    ("ﷵ", "صلعم"),
    ("ﷶ", "رسول"),
    ("ﷷ", "علیه"),
    ("ﷸ", "وسلم"),
    ("ﷹ", "صلی"),
    ("ﷺ", "صلی الله علیه وسلم"),
    ("ﷻ", "جل جلاله"),
    ("﷼", "ریال"),
];

/// 表情符号区段
pub const EMOJI_RANGES: &[(char, char)] = &[
    ('\u{1F600}', '\u{1F64F}'),
    ('\u{1F300}', '\u{1F5FF}'),
    ('\u{1F680}', '\u{1F6FF}'),
    ('\u{1F1E0}', '\u{1F1FF}'),
    ('\u{1F900}', '\u{1F9FF}'),
    ('\u{1FA70}', '\u{1FAFF}'),
    ('\u{2600}', '\u{26FF}'),
    ('\u{2700}', '\u{27BF}'),
];

const STOPWORDS: &[&str] = &[
    "و", "در", "به", "از", "که", "این", "را", "با", "است", "برای", "آن", "یک", "خود", "تا",
    "کرد", "بر", "هم", "نیز", "گفت", "می‌شود", "وی", "شد", "دارد", "ما", "اما", "یا", "شده",
    "باید", "هر", "آنها", "بود", "او", "دیگر", "دو", "مورد", "می‌کند", "شود", "کند", "وجود",
    "بین", "پیش", "شده‌است", "پس", "نظر", "اگر", "همه", "یکی", "حال", "هستند", "من", "کنند",
    "نیست", "باشد", "چه", "بی", "می", "بخش", "می‌کنند", "همین", "افزود", "هایی", "دارند",
    "راه", "همچنین", "روی", "داد", "بیشتر", "بسیار", "سه", "داشت", "چند", "سوی", "تنها",
    "هیچ", "میان", "اینکه", "شدن", "بعد", "جدید", "ولی", "حتی", "کردن", "برخی", "کردند",
    "می‌دهد", "اول", "نه", "کرده‌است", "نسبت", "بیش", "شما", "چنین", "طور", "افراد", "تمام",
    "درباره", "بار", "بسیاری", "می‌تواند", "کرده", "چون", "ندارد", "دوم", "بزرگ", "طی",
    "حدود", "همان", "بدون", "البته", "آنان", "می‌گوید", "دیگری", "خواهد‌شد", "کنیم",
    "قابل", "یعنی", "رشد", "می‌توان", "وارد", "کل", "ویژه", "قبل", "براساس", "نیاز",
    "گذاری", "هنوز", "لازم", "سازی", "بوده‌است", "چرا", "می‌شوند", "وقتی", "گرفت", "کم",
    "جای", "حالی", "تغییر", "پیدا", "اکنون", "تحت", "باعث", "مدت", "فقط", "زیادی", "تعداد",
    "آیا", "بیان", "رو", "شدند", "عدم", "کرده‌اند", "بودن", "نوع", "بلکه", "جاری", "دهد",
    "برابر", "مهم", "بوده", "اخیر", "مربوط", "امر", "زیر", "گیری", "شاید", "خصوص", "آقای",
    "اثر", "کننده", "بودند", "فکر", "کنار", "اولین", "سوم", "سایر", "کنید", "ضمن", "مانند",
    "باز", "می‌گیرد", "ممکن", "حل", "دارای", "پی", "مثل", "می‌رسد", "اجرا", "دور", "منظور",
    "کسی", "موجب", "طول", "امکان", "آنچه", "تعیین", "گفته", "شوند", "جمع", "خیلی", "علاوه",
    "گونه", "تاکنون", "رسید", "سال", "گرفته", "شده‌اند", "علت", "چهار", "داشته‌باشد",
    "خواهد‌بود", "طرف", "تهیه", "تبدیل", "مناسب", "زیرا", "مشخص", "می‌توانند", "نزدیک",
    "جریان", "روند", "بنابراین", "می‌دهند", "یافت", "نخستین", "بالا", "پنج", "ریزی", "عالی",
    "چیزی", "نخست", "بیشتری", "ترتیب", "شده‌بود", "خاص", "خوبی", "خوب", "شروع", "فرد",
    "کامل", "غیر", "می‌رود", "دهند", "آخرین", "دادن", "جدی", "بهترین", "شامل", "گیرد",
    "بخشی", "باشند", "تمامی", "بهتر", "داده‌است", "حد", "نبود", "کسانی", "می‌کرد",
    "داریم", "علیه", "می‌باشد", "دانست", "ناشی", "داشتند", "دهه", "می‌شد", "ایشان", "آنجا",
    "گرفته‌است", "دچار", "می‌آید", "لحاظ", "آنکه", "داده", "بعضی", "هستیم", "اند",
    "برداری", "نباید", "می‌کنیم", "نشست", "سهم", "همیشه", "آمد", "اش", "وگو", "می‌کنم",
    "حداقل", "طبق", "جا", "خواهد‌کرد", "نوعی", "چگونه", "رفت", "هنگام", "فوق", "روش",
    "ندارند", "سعی", "بندی", "شمار", "کلی", "کافی", "مواجه", "همچنان", "زیاد", "سمت",
    "کوچک", "داشته‌است", "چیز", "پشت", "آورد", "حالا", "روبه", "سال‌های", "دادند",
    "می‌کردند", "عهده", "نیمه", "جایی", "دیگران", "سی", "بروز", "یکدیگر", "آمده‌است", "جز",
    "کنم", "سپس", "کنندگان", "خودش", "همواره", "یافته", "شان", "صرف", "نمی‌شود", "رسیدن",
    "چهارم", "یابد", "متر", "ساز", "داشته", "کرده‌بود", "باره", "نحوه", "کردم", "تو", "شخصی",
    "داشته‌باشند", "محسوب", "پخش", "کمی", "متفاوت", "سراسر", "کاملا", "داشتن", "نظیر",
    "آمده", "گروهی", "فردی", "ع", "همچون", "خطر", "خویش", "کدام", "دسته", "سبب", "عین",
    "آوری", "متاسفانه", "بیرون", "دار", "بنده", "بلافاصله", "بالای", "خاطرنشان", "کجا",
];

lazy_static::lazy_static! {
    /// 停用词集合
    pub static ref STOPWORD_SET: HashSet<&'static str> = STOPWORDS.iter().copied().collect();
}

/// 停用词列表
pub fn stopwords() -> &'static [&'static str] {
    STOPWORDS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stopword_set_contains_common_words() {
        for word in ["این", "یک", "است", "وی", "خاطرنشان", "کرد", "از", "می‌شود"] {
            assert!(STOPWORD_SET.contains(word), "{} 应为停用词", word);
        }
    }

    #[test]
    fn test_stopword_set_excludes_content_words() {
        for word in ["ایران", "جهان", "نمونه", "جملهٔ", "زیباتر"] {
            assert!(!STOPWORD_SET.contains(word), "{} 不应为停用词", word);
        }
    }

    #[test]
    fn test_alphabet_mappings_keep_legal_letters() {
        let sources: String = ALPHABET_MAPPINGS.iter().map(|(s, _)| *s).collect();
        for legal in ['ۀ', 'ئ', 'أ', 'ؤ', 'ء', 'ژ', 'آ'] {
            assert!(!sources.contains(legal), "{} 不应被映射", legal);
        }
    }

    #[test]
    fn test_numbers_cover_all_scripts() {
        let numbers = numbers();
        assert!(numbers.contains('۵'));
        assert!(numbers.contains('٥'));
        assert!(numbers.contains('5'));
    }
}
