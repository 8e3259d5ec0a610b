use crate::rng::SeedStream;

///
/// Lexicon
///
/// Deterministic realistic-text provider. Seeded directly from the run seed
/// and consumed in generation order, so the produced names, titles, and
/// sentences replay exactly for a fixed seed. Kept separate from the
/// general-purpose stream so text draws never perturb structural draws.
///

pub struct Lexicon {
    stream: SeedStream,
}

impl Lexicon {
    #[must_use]
    pub fn from_seed(seed: u64) -> Self {
        Self {
            stream: SeedStream::from_seed(seed),
        }
    }

    /// "First Last" person name.
    pub fn full_name(&mut self) -> String {
        let first = self.pick(FIRST_NAMES);
        let last = self.pick(LAST_NAMES);
        format!("{first} {last}")
    }

    pub fn job_title(&mut self) -> String {
        self.pick(JOB_TITLES).to_string()
    }

    pub fn word(&mut self) -> &'static str {
        self.pick(WORDS)
    }

    /// Sentence of exactly `words` lowercase words, capitalized and
    /// terminated with a period.
    pub fn sentence(&mut self, words: usize) -> String {
        let mut text = String::new();
        for index in 0..words.max(1) {
            if index > 0 {
                text.push(' ');
            }
            text.push_str(self.word());
        }
        let mut chars = text.chars();
        let mut sentence = match chars.next() {
            Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
            None => text,
        };
        sentence.push('.');
        sentence
    }

    fn pick(&mut self, table: &'static [&'static str]) -> &'static str {
        self.stream.choose(table).copied().unwrap_or_default()
    }
}

/// Lowercase `text`, map spaces to dashes, and drop everything that is not
/// alphanumeric or a dash.
#[must_use]
pub fn slug(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .map(|c| if c == ' ' { '-' } else { c })
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-')
        .collect()
}

const FIRST_NAMES: &[&str] = &[
    "Ada", "Amara", "Andre", "Anika", "Arjun", "Astrid", "Bea", "Bram", "Carmen", "Cass", "Dana",
    "Dario", "Devi", "Eero", "Elif", "Emeka", "Esme", "Felix", "Freya", "Gabriel", "Greta",
    "Hana", "Hugo", "Ines", "Ivo", "Jana", "Joon", "Kai", "Lena", "Luca", "Mei", "Milan", "Nadia",
    "Nico", "Noor", "Otto", "Paula", "Priya", "Rafael", "Rosa", "Sana", "Sasha", "Tariq", "Tess",
    "Uma", "Viktor", "Wren", "Yuki",
];

const LAST_NAMES: &[&str] = &[
    "Abbott", "Alvarez", "Banner", "Becker", "Bianchi", "Calder", "Castillo", "Dvorak", "Ellis",
    "Ferrara", "Fischer", "Fontaine", "Garber", "Haines", "Halvorsen", "Hart", "Ibarra", "Iqbal",
    "Jansen", "Kato", "Keller", "Kovacs", "Laurent", "Lindqvist", "Maddox", "Marsh", "Mbeki",
    "Mercer", "Nakamura", "Novak", "Okafor", "Ortega", "Petrov", "Quinn", "Rahman", "Reyes",
    "Sandoval", "Sato", "Skov", "Sorensen", "Tanaka", "Ueda", "Vance", "Varga", "Weiss",
    "Whitfield", "Yoshida", "Zhang",
];

const JOB_TITLES: &[&str] = &[
    "Account Executive",
    "Backend Engineer",
    "Brand Designer",
    "Business Analyst",
    "Community Manager",
    "Content Strategist",
    "Customer Success Manager",
    "Data Engineer",
    "Data Scientist",
    "Design Lead",
    "Developer Advocate",
    "Engineering Manager",
    "Finance Partner",
    "Frontend Engineer",
    "Growth Marketer",
    "IT Administrator",
    "Infrastructure Engineer",
    "Legal Counsel",
    "Machine Learning Engineer",
    "Marketing Director",
    "Office Coordinator",
    "Operations Lead",
    "Partnerships Manager",
    "People Ops Specialist",
    "Platform Engineer",
    "Product Designer",
    "Product Manager",
    "QA Engineer",
    "Recruiter",
    "Release Manager",
    "Research Scientist",
    "Sales Engineer",
    "Security Analyst",
    "Site Reliability Engineer",
    "Solutions Architect",
    "Staff Engineer",
    "Support Specialist",
    "Technical Writer",
    "UX Researcher",
    "VP of Engineering",
];

const WORDS: &[&str] = &[
    "anchor", "angle", "archive", "aspect", "atlas", "aurora", "badge", "ballast", "banner",
    "basin", "beacon", "bearing", "bloom", "border", "bounty", "branch", "bridge", "brook",
    "buffer", "cadence", "canvas", "canyon", "cascade", "cedar", "channel", "chart", "cinder",
    "circuit", "cliff", "clover", "cobalt", "compass", "copper", "coral", "corner", "course",
    "crater", "crest", "current", "dawn", "delta", "drift", "ember", "estuary", "fathom", "fern",
    "field", "fjord", "flint", "forge", "fountain", "garnet", "glacier", "grove", "harbor",
    "hollow", "horizon", "island", "jetty", "juniper", "lagoon", "lantern", "ledger", "linden",
    "lumen", "marble", "meadow", "meridian", "mesa", "mirror", "monsoon", "moraine", "mosaic",
    "north", "oasis", "orbit", "osprey", "outpost", "packet", "pebble", "pinnacle", "prairie",
    "prism", "quarry", "quartz", "ranger", "rapids", "ravine", "reef", "ridge", "river", "saddle",
    "sierra", "signal", "slate", "summit", "thicket", "timber", "trellis", "tundra", "vertex",
    "voyage", "willow", "zenith",
];

///
/// TESTS
///
