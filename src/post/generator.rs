use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use super::Post;

/// Source of seed posts.
pub trait PostGenerator {
    fn generate(&mut self) -> Post;

    /// Call [`generate`](Self::generate) exactly `count` times.
    fn generate_many(&mut self, count: usize) -> Vec<Post> {
        (0..count).map(|_| self.generate()).collect()
    }
}

impl<F> PostGenerator for F
where
    F: FnMut() -> Post,
{
    fn generate(&mut self) -> Post {
        self()
    }
}

const ABBREVIATIONS: &[&str] = &[
    "ADP", "AGP", "AI", "API", "ASCII", "CLI", "COM", "CSS", "DNS", "DRAM", "EXE", "FTP", "GB",
    "HDD", "HEX", "HTTP", "IB", "IP", "JBOD", "JSON", "OCR", "PCI", "PNG", "RAM", "RSS", "SAS",
    "SCSI", "SDD", "SMS", "SMTP", "SQL", "SSD", "SSL", "TCP", "THX", "TLS", "UDP", "USB", "UTF8",
    "VGA", "XML", "XSS",
];

const ADJECTIVES: &[&str] = &[
    "auxiliary",
    "primary",
    "back-end",
    "digital",
    "open-source",
    "virtual",
    "cross-platform",
    "redundant",
    "online",
    "haptic",
    "multi-byte",
    "bluetooth",
    "wireless",
    "1080p",
    "neural",
    "optical",
    "solid state",
    "mobile",
];

const NOUNS: &[&str] = &[
    "driver",
    "protocol",
    "bandwidth",
    "panel",
    "microchip",
    "program",
    "port",
    "card",
    "array",
    "interface",
    "system",
    "sensor",
    "firewall",
    "hard drive",
    "pixel",
    "alarm",
    "feed",
    "monitor",
    "application",
    "transmitter",
    "bus",
    "circuit",
    "capacitor",
    "matrix",
];

const VERBS: &[&str] = &[
    "back up",
    "bypass",
    "hack",
    "override",
    "compress",
    "copy",
    "navigate",
    "index",
    "connect",
    "generate",
    "quantify",
    "calculate",
    "synthesize",
    "input",
    "transmit",
    "program",
    "reboot",
    "parse",
];

const ING_VERBS: &[&str] = &[
    "backing up",
    "bypassing",
    "hacking",
    "overriding",
    "compressing",
    "copying",
    "navigating",
    "indexing",
    "connecting",
    "generating",
    "quantifying",
    "calculating",
    "synthesizing",
    "transmitting",
    "programming",
    "parsing",
];

const PHRASES: &[&str] = &[
    "If we {verb} the {noun}, we can get to the {abbreviation} {noun} through the {adjective} {abbreviation} {noun}!",
    "We need to {verb} the {adjective} {abbreviation} {noun}!",
    "Try to {verb} the {abbreviation} {noun}, maybe it will {verb} the {adjective} {noun}!",
    "You can't {verb} the {noun} without {ingverb} the {adjective} {abbreviation} {noun}!",
    "Use the {adjective} {abbreviation} {noun}, then you can {verb} the {adjective} {noun}!",
    "The {abbreviation} {noun} is down, {verb} the {adjective} {noun} so we can {verb} the {abbreviation} {noun}!",
    "{ingverb} the {noun} won't do anything, we need to {verb} the {adjective} {abbreviation} {noun}!",
    "I'll {verb} the {adjective} {abbreviation} {noun}, that should {noun} the {abbreviation} {noun}!",
];

/// Generates tech-jargon posts: `"<adjective> <noun>"` titles and bodies
/// drawn from a set of phrase templates.
#[derive(Debug, Clone)]
pub struct HackerPostGenerator<R = StdRng> {
    rng: R,
}

impl HackerPostGenerator<StdRng> {
    /// Seeded from OS entropy.
    pub fn new() -> Self {
        Self::from_rng(StdRng::from_entropy())
    }

    /// Reproducible sequence for a given seed.
    pub fn seeded(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }
}

impl Default for HackerPostGenerator<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> HackerPostGenerator<R> {
    pub fn from_rng(rng: R) -> Self {
        Self { rng }
    }

    fn pick(&mut self, words: &'static [&'static str]) -> &'static str {
        // Word lists are non-empty constants.
        words.choose(&mut self.rng).copied().unwrap_or_default()
    }

    fn placeholder(&mut self, name: &str) -> Option<&'static str> {
        let words = match name {
            "abbreviation" => ABBREVIATIONS,
            "adjective" => ADJECTIVES,
            "noun" => NOUNS,
            "verb" => VERBS,
            "ingverb" => ING_VERBS,
            _ => return None,
        };
        Some(self.pick(words))
    }

    pub fn title(&mut self) -> String {
        let adjective = self.pick(ADJECTIVES);
        let noun = self.pick(NOUNS);
        format!("{adjective} {noun}")
    }

    /// Fill a phrase template, each placeholder drawing a fresh word.
    pub fn phrase(&mut self) -> String {
        let template = self.pick(PHRASES);
        let mut out = String::with_capacity(template.len() * 2);
        let mut rest = template;

        while let Some(start) = rest.find('{') {
            out.push_str(&rest[..start]);
            let tail = &rest[start..];
            match tail.find('}') {
                Some(end) => {
                    let name = &tail[1..end];
                    match self.placeholder(name) {
                        Some(word) => out.push_str(word),
                        None => out.push_str(&tail[..=end]),
                    }
                    rest = &tail[end + 1..];
                }
                None => {
                    out.push_str(tail);
                    rest = "";
                }
            }
        }
        out.push_str(rest);

        capitalize(&out)
    }
}

impl<R: Rng> PostGenerator for HackerPostGenerator<R> {
    fn generate(&mut self) -> Post {
        Post::new(self.title(), self.phrase())
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
