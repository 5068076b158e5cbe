/// Phrases common to every deployment.
pub const BASE_KEYWORDS: &[&str] = &[
    "free",
    "winner",
    "congratulations",
    "urgent",
    "limited time",
    "click here",
    "act now",
    "offer expires",
    "guaranteed",
    "no obligation",
    "risk free",
    "cash bonus",
    "earn money",
    "work from home",
    "make money fast",
    "viagra",
    "cialis",
    "pharmacy",
    "prescription",
    "weight loss",
    "lottery",
    "prize",
    "sweepstakes",
    "inheritance",
    "beneficiary",
];

/// Advance-fee and identity-fraud phrases, used by the server profile.
pub const FRAUD_KEYWORDS: &[&str] = &[
    "nigerian prince",
    "bank transfer",
    "wire transfer",
    "western union",
    "credit card",
    "social security",
    "tax refund",
    "irs",
    "government grant",
];

/// Bait phrases, used by the server profile.
pub const BAIT_KEYWORDS: &[&str] = &["free money", "claim your"];

/// Ordered, lower-cased, de-duplicated spam indicators. Built once at startup.
#[derive(Debug, Clone, Default)]
pub struct KeywordSet {
    keywords: Vec<String>,
}

impl KeywordSet {
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::default();
        set.extend(keywords);
        set
    }

    /// Keyword list for a deployment: the base list, optionally the extended
    /// fraud and bait lists, then operator-supplied extras.
    pub fn for_deployment(extended: bool, extras: &[String]) -> Self {
        let mut set = Self::new(BASE_KEYWORDS);
        if extended {
            set.extend(FRAUD_KEYWORDS);
            set.extend(BAIT_KEYWORDS);
        }
        set.extend(extras);
        set
    }

    fn extend<I, S>(&mut self, keywords: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for keyword in keywords {
            let keyword = keyword.as_ref().trim().to_lowercase();
            if keyword.is_empty() || self.keywords.contains(&keyword) {
                continue;
            }
            self.keywords.push(keyword);
        }
    }

    /// Keywords found in `lowered`, each at most once.
    pub fn matches<'a>(&'a self, lowered: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.keywords
            .iter()
            .map(String::as_str)
            .filter(move |keyword| lowered.contains(keyword))
    }

    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.keywords.iter().map(String::as_str)
    }
}
