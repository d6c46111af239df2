//! Deterministic text faking from curated lists.
//!
//! The core treats every string produced here as opaque. All generation
//! draws from the caller's TableRng, so the same stream yields the same
//! names, addresses and numbers.
//!
//! Locale choice happens per call (a city and a region in the same record
//! may come from different locales), matching how a multi-locale faker
//! behaves.

use crate::rng::TableRng;
use serde::{Deserialize, Serialize};

/// The collaborator seam: everything free-form the synthesizers need.
pub trait TextFaker {
    fn first_name(&self, rng: &mut TableRng) -> String;
    fn last_name(&self, rng: &mut TableRng) -> String;
    fn email(&self, rng: &mut TableRng) -> String;
    fn phone_number(&self, rng: &mut TableRng) -> String;
    fn ssn(&self, rng: &mut TableRng) -> String;
    fn street_address(&self, rng: &mut TableRng) -> String;
    fn city(&self, rng: &mut TableRng) -> String;
    fn state(&self, rng: &mut TableRng) -> String;
    fn postcode(&self, rng: &mut TableRng) -> String;
    fn country(&self, rng: &mut TableRng) -> String;
    fn company(&self, rng: &mut TableRng) -> String;
    fn word(&self, rng: &mut TableRng) -> String;
    fn sentence(&self, rng: &mut TableRng, words: usize) -> String;
    fn credit_card_number(&self, rng: &mut TableRng) -> String;
    fn routing_number(&self, rng: &mut TableRng) -> String;
    fn bothify(&self, rng: &mut TableRng, pattern: &str) -> String {
        bothify(rng, pattern)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Locale {
    #[serde(rename = "en_US")]
    EnUs,
    #[serde(rename = "en_GB")]
    EnGb,
    #[serde(rename = "en_CA")]
    EnCa,
    #[serde(rename = "en_AU")]
    EnAu,
}

impl Locale {
    pub const ALL: [Locale; 4] = [Locale::EnUs, Locale::EnGb, Locale::EnCa, Locale::EnAu];

    pub fn code(&self) -> &'static str {
        match self {
            Self::EnUs => "en_US",
            Self::EnGb => "en_GB",
            Self::EnCa => "en_CA",
            Self::EnAu => "en_AU",
        }
    }

    fn cities(&self) -> &'static [&'static str] {
        match self {
            Self::EnUs => &[
                "Springfield", "Riverside", "Franklin", "Greenville", "Bristol", "Clinton",
                "Fairview", "Salem", "Madison", "Georgetown", "Arlington", "Ashland",
                "Dover", "Oxford", "Jackson", "Burlington", "Manchester", "Milton",
                "Newport", "Auburn", "Dayton", "Lexington", "Centerville", "Mount Vernon",
            ],
            Self::EnGb => &[
                "London", "Birmingham", "Leeds", "Glasgow", "Sheffield", "Bradford",
                "Liverpool", "Edinburgh", "Bristol", "Cardiff", "Leicester", "Coventry",
                "Nottingham", "Newcastle", "Brighton", "Plymouth", "Reading", "Norwich",
            ],
            Self::EnCa => &[
                "Toronto", "Montreal", "Vancouver", "Calgary", "Edmonton", "Ottawa",
                "Winnipeg", "Quebec City", "Hamilton", "Kitchener", "London", "Victoria",
                "Halifax", "Oshawa", "Windsor", "Saskatoon", "Regina", "St. John's",
            ],
            Self::EnAu => &[
                "Sydney", "Melbourne", "Brisbane", "Perth", "Adelaide", "Gold Coast",
                "Newcastle", "Canberra", "Wollongong", "Geelong", "Hobart", "Townsville",
                "Cairns", "Darwin", "Toowoomba", "Ballarat", "Bendigo", "Launceston",
            ],
        }
    }

    fn regions(&self) -> &'static [&'static str] {
        match self {
            Self::EnUs => &[
                "Alabama", "Alaska", "Arizona", "Arkansas", "California", "Colorado",
                "Connecticut", "Delaware", "Florida", "Georgia", "Hawaii", "Idaho",
                "Illinois", "Indiana", "Iowa", "Kansas", "Kentucky", "Louisiana",
                "Maine", "Maryland", "Massachusetts", "Michigan", "Minnesota",
                "Mississippi", "Missouri", "Montana", "Nebraska", "Nevada",
                "New Hampshire", "New Jersey", "New Mexico", "New York",
                "North Carolina", "North Dakota", "Ohio", "Oklahoma", "Oregon",
                "Pennsylvania", "Rhode Island", "South Carolina", "South Dakota",
                "Tennessee", "Texas", "Utah", "Vermont", "Virginia", "Washington",
                "West Virginia", "Wisconsin", "Wyoming",
            ],
            Self::EnGb => &[
                "Greater London", "West Midlands", "Greater Manchester", "West Yorkshire",
                "Kent", "Essex", "Merseyside", "Lancashire", "Surrey", "Hampshire",
                "Norfolk", "Devon", "Cornwall", "Lothian", "Glamorgan",
            ],
            Self::EnCa => &[
                "Ontario", "Quebec", "British Columbia", "Alberta", "Manitoba",
                "Saskatchewan", "Nova Scotia", "New Brunswick",
                "Newfoundland and Labrador", "Prince Edward Island",
                "Northwest Territories", "Yukon", "Nunavut",
            ],
            Self::EnAu => &[
                "New South Wales", "Victoria", "Queensland", "Western Australia",
                "South Australia", "Tasmania", "Australian Capital Territory",
                "Northern Territory",
            ],
        }
    }

    fn postcode_patterns(&self) -> &'static [&'static str] {
        match self {
            Self::EnUs => &["#####"],
            Self::EnGb => &["??# #??", "??## #??", "?# #??"],
            Self::EnCa => &["?#? #?#"],
            Self::EnAu => &["####"],
        }
    }

    fn phone_patterns(&self) -> &'static [&'static str] {
        match self {
            Self::EnUs => &[
                "(###) ###-####", "###-###-####", "###.###.####",
                "+1-###-###-####", "###-###-####x###",
            ],
            Self::EnGb => &["0#### ######", "+44(0)#### ######", "0### #### ####"],
            Self::EnCa => &["###-###-####", "(###) ###-####", "+1 ### ### ####"],
            Self::EnAu => &["(0#) #### ####", "+61 # #### ####", "04## ### ###"],
        }
    }
}

/// Faker backed by the curated lists in this module.
#[derive(Debug, Clone)]
pub struct CuratedFaker {
    locales: Vec<Locale>,
}

impl CuratedFaker {
    /// An empty locale list falls back to en_US.
    pub fn new(locales: &[Locale]) -> Self {
        let locales = if locales.is_empty() {
            vec![Locale::EnUs]
        } else {
            locales.to_vec()
        };
        Self { locales }
    }

    pub fn locales(&self) -> &[Locale] {
        &self.locales
    }

    fn locale(&self, rng: &mut TableRng) -> Locale {
        *rng.pick(&self.locales)
    }
}

impl Default for CuratedFaker {
    fn default() -> Self {
        Self::new(&Locale::ALL)
    }
}

impl TextFaker for CuratedFaker {
    fn first_name(&self, rng: &mut TableRng) -> String {
        rng.pick(FIRST_NAMES).to_string()
    }

    fn last_name(&self, rng: &mut TableRng) -> String {
        rng.pick(LAST_NAMES).to_string()
    }

    fn email(&self, rng: &mut TableRng) -> String {
        let first = rng.pick(FIRST_NAMES).to_lowercase();
        let last = rng.pick(LAST_NAMES).to_lowercase();
        let domain = rng.pick(EMAIL_DOMAINS);
        match rng.next_u64_below(3) {
            0 => format!("{first}.{last}@{domain}"),
            1 => format!("{first}{}@{domain}", rng.next_u64_below(100)),
            _ => format!("{}{last}@{domain}", &first[..1]),
        }
    }

    fn phone_number(&self, rng: &mut TableRng) -> String {
        let locale = self.locale(rng);
        let pattern = *rng.pick(locale.phone_patterns());
        bothify(rng, pattern)
    }

    fn ssn(&self, rng: &mut TableRng) -> String {
        // Area 666 and 900+ are never issued; group and serial are never zero.
        let area = loop {
            let a = rng.int_inclusive(1, 899);
            if a != 666 {
                break a;
            }
        };
        let group = rng.int_inclusive(1, 99);
        let serial = rng.int_inclusive(1, 9999);
        format!("{area:03}-{group:02}-{serial:04}")
    }

    fn street_address(&self, rng: &mut TableRng) -> String {
        let number = rng.int_inclusive(1, 9999);
        let name = rng.pick(STREET_NAMES);
        let suffix = rng.pick(STREET_SUFFIXES);
        if rng.chance(0.25) {
            format!("{number} {name} {suffix}, Apt. {}", rng.int_inclusive(1, 999))
        } else {
            format!("{number} {name} {suffix}")
        }
    }

    fn city(&self, rng: &mut TableRng) -> String {
        let locale = self.locale(rng);
        rng.pick(locale.cities()).to_string()
    }

    fn state(&self, rng: &mut TableRng) -> String {
        let locale = self.locale(rng);
        rng.pick(locale.regions()).to_string()
    }

    fn postcode(&self, rng: &mut TableRng) -> String {
        let locale = self.locale(rng);
        let pattern = *rng.pick(locale.postcode_patterns());
        bothify(rng, pattern)
    }

    fn country(&self, rng: &mut TableRng) -> String {
        rng.pick(COUNTRIES).to_string()
    }

    fn company(&self, rng: &mut TableRng) -> String {
        match rng.next_u64_below(3) {
            0 => format!("{} {}", rng.pick(LAST_NAMES), rng.pick(COMPANY_SUFFIXES)),
            1 => format!("{}-{}", rng.pick(LAST_NAMES), rng.pick(LAST_NAMES)),
            _ => format!(
                "{}, {} and {}",
                rng.pick(LAST_NAMES),
                rng.pick(LAST_NAMES),
                rng.pick(LAST_NAMES)
            ),
        }
    }

    fn word(&self, rng: &mut TableRng) -> String {
        rng.pick(WORDS).to_string()
    }

    fn sentence(&self, rng: &mut TableRng, words: usize) -> String {
        let words = words.max(1);
        let mut out = String::new();
        for i in 0..words {
            let word = *rng.pick(WORDS);
            if i == 0 {
                let mut chars = word.chars();
                if let Some(c) = chars.next() {
                    out.extend(c.to_uppercase());
                    out.push_str(chars.as_str());
                }
            } else {
                out.push(' ');
                out.push_str(word);
            }
        }
        out.push('.');
        out
    }

    fn credit_card_number(&self, rng: &mut TableRng) -> String {
        let (prefix, len) = *rng.pick(CARD_LAYOUTS);
        let mut digits: Vec<u8> = prefix.bytes().map(|b| b - b'0').collect();
        while digits.len() < len - 1 {
            digits.push(rng.next_u64_below(10) as u8);
        }
        digits.push(luhn_check_digit(&digits));
        digits.iter().map(|d| char::from(b'0' + d)).collect()
    }

    fn routing_number(&self, rng: &mut TableRng) -> String {
        // First two digits are a Federal Reserve routing symbol (01–12).
        let fed = rng.int_inclusive(1, 12) as u8;
        let mut digits = vec![fed / 10, fed % 10];
        while digits.len() < 8 {
            digits.push(rng.next_u64_below(10) as u8);
        }
        digits.push(aba_check_digit(&digits));
        digits.iter().map(|d| char::from(b'0' + d)).collect()
    }
}

/// Expand `#` to a digit and `?` to an uppercase letter.
pub fn bothify(rng: &mut TableRng, pattern: &str) -> String {
    pattern
        .chars()
        .map(|c| match c {
            '#' => char::from(b'0' + rng.next_u64_below(10) as u8),
            '?' => char::from(b'A' + rng.next_u64_below(26) as u8),
            other => other,
        })
        .collect()
}

/// Check digit that makes `payload` + digit pass the Luhn test.
pub fn luhn_check_digit(payload: &[u8]) -> u8 {
    let sum: u32 = payload
        .iter()
        .rev()
        .enumerate()
        .map(|(i, &d)| {
            let d = d as u32;
            if i % 2 == 0 {
                let doubled = d * 2;
                if doubled > 9 { doubled - 9 } else { doubled }
            } else {
                d
            }
        })
        .sum();
    ((10 - sum % 10) % 10) as u8
}

/// Ninth ABA digit for the first eight: 3·(d1+d4+d7) + 7·(d2+d5+d8) + (d3+d6+d9) ≡ 0 mod 10.
pub fn aba_check_digit(first_eight: &[u8]) -> u8 {
    let d: Vec<u32> = first_eight.iter().map(|&x| x as u32).collect();
    let partial = 3 * (d[0] + d[3] + d[6]) + 7 * (d[1] + d[4] + d[7]) + (d[2] + d[5]);
    ((10 - partial % 10) % 10) as u8
}

const CARD_LAYOUTS: &[(&str, usize)] = &[
    ("4", 16),
    ("51", 16),
    ("52", 16),
    ("53", 16),
    ("54", 16),
    ("55", 16),
    ("34", 15),
    ("37", 15),
    ("6011", 16),
    ("3528", 16),
];

const FIRST_NAMES: &[&str] = &[
    "Aaliyah", "Abdul", "Adrian", "Aisha", "Alan", "Alicia", "Amelia", "Andre",
    "Angela", "Arjun", "Audrey", "Beatrice", "Bethany", "Bradley", "Caleb", "Camila",
    "Carlos", "Chloe", "Colin", "Connor", "Dale", "Darius", "Deepa", "Derek",
    "Diego", "Eleanor", "Elena", "Eli", "Erin", "Fatima", "Felix", "Fiona",
    "Gavin", "Georgia", "Graham", "Hailey", "Hamish", "Harriet", "Hiro", "Ian",
    "Imogen", "Isaac", "Ivy", "Jade", "Jamal", "Jasper", "Jenna", "Joel",
    "Kara", "Keisha", "Kieran", "Lachlan", "Layla", "Leon", "Liam", "Lucy",
    "Malcolm", "Marcus", "Maya", "Mei", "Miles", "Molly", "Nadia", "Neil",
    "Nina", "Oliver", "Omar", "Owen", "Paige", "Priya", "Quinn", "Rafael",
    "Rhys", "Rosa", "Rowan", "Ruby", "Sanjay", "Scarlett", "Sean", "Simone",
    "Sophie", "Tariq", "Tessa", "Theo", "Trent", "Uma", "Valerie", "Wade",
    "Wendy", "Xavier", "Yasmin", "Yusuf", "Zach", "Zara", "Zoe", "Morgan",
];

const LAST_NAMES: &[&str] = &[
    "Abbott", "Acosta", "Ahmed", "Barker", "Bishop", "Blake", "Bowen", "Brennan",
    "Burke", "Chambers", "Chandler", "Choi", "Clarke", "Dalton", "Dawson", "Doyle",
    "Duffy", "Fleming", "Fletcher", "Fraser", "Gallagher", "Gill", "Goodwin", "Hale",
    "Hartley", "Hodge", "Holt", "Hussain", "Ingram", "Iqbal", "Jennings", "Kaur",
    "Keane", "Khan", "Lambert", "Lin", "Lowe", "Lynch", "MacLeod", "Mahoney",
    "McKenzie", "Mercer", "Nash", "Noble", "Norris", "Oakley", "O'Brien", "Osei",
    "Pearce", "Pham", "Quinn", "Rahman", "Rankin", "Rhodes", "Riley", "Sandhu",
    "Sharma", "Sutton", "Tan", "Thornton", "Vaughn", "Wade", "Walsh", "Whitaker",
    "Yates", "Young",
];

const EMAIL_DOMAINS: &[&str] = &[
    "example.com", "example.org", "example.net", "mailbox.test", "inbox.test",
];

const STREET_NAMES: &[&str] = &[
    "Maple", "Oak", "Cedar", "Elm", "Pine", "Willow", "Birch", "Hillcrest",
    "Lakeview", "Sunset", "Park", "Church", "High", "Station", "Victoria", "King",
    "Queen", "Mill", "Bridge", "Harbour", "Meadow", "Orchard", "River", "Spring",
];

const STREET_SUFFIXES: &[&str] = &[
    "Street", "Avenue", "Road", "Lane", "Drive", "Court", "Way", "Crescent",
    "Place", "Terrace", "Boulevard", "Close",
];

const COMPANY_SUFFIXES: &[&str] = &["Inc", "LLC", "Ltd", "Group", "PLC", "and Sons", "Pty Ltd"];

const COUNTRIES: &[&str] = &[
    "Argentina", "Australia", "Austria", "Belgium", "Brazil", "Canada", "Chile",
    "China", "Colombia", "Denmark", "Egypt", "Finland", "France", "Germany",
    "Ghana", "Greece", "India", "Indonesia", "Ireland", "Israel", "Italy",
    "Japan", "Kenya", "Malaysia", "Mexico", "Morocco", "Netherlands",
    "New Zealand", "Nigeria", "Norway", "Peru", "Philippines", "Poland",
    "Portugal", "Singapore", "South Africa", "South Korea", "Spain", "Sweden",
    "Switzerland", "Thailand", "Turkey", "United Kingdom", "United States of America",
    "Vietnam",
];

const WORDS: &[&str] = &[
    "account", "agent", "amount", "around", "balance", "bank", "become", "before",
    "billing", "budget", "building", "card", "charge", "city", "close", "college",
    "country", "credit", "daily", "debt", "deposit", "during", "early", "effort",
    "enough", "event", "family", "field", "final", "fund", "future", "growth",
    "health", "history", "home", "interest", "kitchen", "later", "ledger", "local",
    "market", "member", "money", "month", "morning", "note", "office", "order",
    "partner", "payment", "period", "plan", "policy", "price", "public", "purchase",
    "receipt", "record", "refund", "report", "return", "saving", "season", "service",
    "share", "shop", "simple", "statement", "store", "summer", "system", "table",
    "ticket", "today", "total", "travel", "value", "weekly", "window", "yearly",
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::{RngBank, TableSlot};

    fn rng() -> TableRng {
        RngBank::new(12345).for_table(TableSlot::Customers)
    }

    fn passes_luhn(number: &str) -> bool {
        let digits: Vec<u8> = number.bytes().map(|b| b - b'0').collect();
        let (payload, check) = digits.split_at(digits.len() - 1);
        luhn_check_digit(payload) == check[0]
    }

    #[test]
    fn faking_is_deterministic() {
        let faker = CuratedFaker::default();
        let mut a = rng();
        let mut b = rng();
        for _ in 0..20 {
            assert_eq!(faker.street_address(&mut a), faker.street_address(&mut b));
            assert_eq!(faker.phone_number(&mut a), faker.phone_number(&mut b));
        }
    }

    #[test]
    fn card_numbers_pass_luhn() {
        let faker = CuratedFaker::default();
        let mut rng = rng();
        for _ in 0..200 {
            let number = faker.credit_card_number(&mut rng);
            assert!(number.len() == 15 || number.len() == 16, "bad length: {number}");
            assert!(passes_luhn(&number), "luhn failed: {number}");
        }
        // Known-good reference number.
        assert!(passes_luhn("4111111111111111"));
    }

    #[test]
    fn routing_numbers_pass_aba_checksum() {
        let faker = CuratedFaker::default();
        let mut rng = rng();
        for _ in 0..200 {
            let aba = faker.routing_number(&mut rng);
            assert_eq!(aba.len(), 9);
            let d: Vec<u32> = aba.bytes().map(|b| (b - b'0') as u32).collect();
            let sum = 3 * (d[0] + d[3] + d[6]) + 7 * (d[1] + d[4] + d[7]) + (d[2] + d[5] + d[8]);
            assert_eq!(sum % 10, 0, "checksum failed: {aba}");
            let fed: u32 = aba[..2].parse().unwrap();
            assert!((1..=12).contains(&fed), "fed symbol out of range: {aba}");
        }
    }

    #[test]
    fn ssn_has_area_group_serial_shape() {
        let faker = CuratedFaker::default();
        let mut rng = rng();
        for _ in 0..200 {
            let ssn = faker.ssn(&mut rng);
            let parts: Vec<&str> = ssn.split('-').collect();
            assert_eq!(parts.len(), 3, "SSN must have 3 parts: {ssn}");
            assert_eq!((parts[0].len(), parts[1].len(), parts[2].len()), (3, 2, 4));
            assert_ne!(parts[0], "666");
            assert_ne!(parts[1], "00");
            assert_ne!(parts[2], "0000");
        }
    }

    #[test]
    fn bothify_expands_digits_and_letters() {
        let mut rng = rng();
        let reference = bothify(&mut rng, "REF-####-????");
        assert_eq!(reference.len(), 13);
        assert!(reference.starts_with("REF-"));
        assert!(reference[4..8].chars().all(|c| c.is_ascii_digit()));
        assert_eq!(&reference[8..9], "-");
        assert!(reference[9..].chars().all(|c| c.is_ascii_uppercase()));
    }

    #[test]
    fn sentence_has_requested_word_count() {
        let faker = CuratedFaker::default();
        let mut rng = rng();
        let s = faker.sentence(&mut rng, 6);
        assert!(s.ends_with('.'));
        assert_eq!(s.trim_end_matches('.').split(' ').count(), 6);
        assert!(s.chars().next().unwrap().is_uppercase());
    }

    #[test]
    fn single_locale_restricts_regions() {
        let faker = CuratedFaker::new(&[Locale::EnAu]);
        let mut rng = rng();
        for _ in 0..50 {
            let state = faker.state(&mut rng);
            assert!(Locale::EnAu.regions().contains(&state.as_str()), "{state}");
            let pc = faker.postcode(&mut rng);
            assert!(pc.len() == 4 && pc.chars().all(|c| c.is_ascii_digit()), "{pc}");
        }
    }

    #[test]
    fn empty_locale_list_falls_back_to_us() {
        assert_eq!(CuratedFaker::new(&[]).locales(), &[Locale::EnUs]);
    }

    #[test]
    fn locale_code_matches_config_name() {
        for locale in Locale::ALL {
            let json = serde_json::to_string(&locale).unwrap();
            assert_eq!(json, format!("\"{}\"", locale.code()));
        }
    }
}
