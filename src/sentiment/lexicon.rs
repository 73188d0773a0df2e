/// (word, polarity, subjectivity)
pub(super) const ENTRIES: &[(&str, f64, f64)] = &[
    ("alive", 0.1, 0.4),
    ("alone", -0.1, 0.6),
    ("amazing", 0.6, 0.9),
    ("angry", -0.5, 1.0),
    ("awful", -1.0, 1.0),
    ("bad", -0.7, 0.67),
    ("beautiful", 0.85, 1.0),
    ("best", 1.0, 0.3),
    ("better", 0.5, 0.5),
    ("bitter", -0.1, 0.4),
    ("blessed", 0.5, 0.6),
    ("blue", 0.0, 0.1),
    ("bright", 0.7, 0.9),
    ("broke", -0.4, 0.4),
    ("broken", -0.4, 0.4),
    ("calm", 0.3, 0.75),
    ("cold", -0.6, 1.0),
    ("crazy", -0.6, 0.9),
    ("cruel", -1.0, 1.0),
    ("cry", -0.2, 0.6),
    ("dark", -0.15, 0.4),
    ("dead", -0.2, 0.4),
    ("dirty", -0.6, 0.8),
    ("dope", 0.5, 0.6),
    ("dumb", -0.4, 0.5),
    ("easy", 0.43, 0.83),
    ("empty", -0.1, 0.5),
    ("evil", -1.0, 1.0),
    ("fake", -0.5, 1.0),
    ("fine", 0.42, 0.5),
    ("free", 0.4, 0.8),
    ("fresh", 0.3, 0.5),
    ("funny", 0.25, 1.0),
    ("glad", 0.5, 1.0),
    ("good", 0.7, 0.6),
    ("great", 0.8, 0.75),
    ("happy", 0.8, 1.0),
    ("hard", -0.29, 0.54),
    ("hate", -0.8, 0.9),
    ("heavy", -0.2, 0.5),
    ("high", 0.16, 0.54),
    ("holy", 0.2, 0.5),
    ("hot", 0.25, 0.85),
    ("hurt", -0.5, 0.8),
    ("kind", 0.6, 0.9),
    ("lonely", -0.25, 0.75),
    ("lost", -0.3, 0.5),
    ("love", 0.5, 0.6),
    ("lovely", 0.5, 0.75),
    ("lucky", 0.33, 1.0),
    ("mad", -0.62, 1.0),
    ("nice", 0.6, 1.0),
    ("pain", -0.4, 0.7),
    ("perfect", 1.0, 1.0),
    ("poor", -0.4, 0.6),
    ("pretty", 0.25, 1.0),
    ("proud", 0.8, 1.0),
    ("real", 0.2, 0.3),
    ("rich", 0.38, 0.75),
    ("right", 0.29, 0.54),
    ("sad", -0.5, 1.0),
    ("safe", 0.5, 0.5),
    ("scared", -0.5, 0.9),
    ("sick", -0.71, 0.86),
    ("slow", -0.3, 0.39),
    ("soft", 0.1, 0.4),
    ("sorry", -0.5, 1.0),
    ("strong", 0.43, 0.73),
    ("stupid", -0.8, 1.0),
    ("sweet", 0.35, 0.65),
    ("terrible", -1.0, 1.0),
    ("tired", -0.4, 0.7),
    ("true", 0.35, 0.65),
    ("ugly", -0.7, 1.0),
    ("warm", 0.6, 0.6),
    ("weak", -0.38, 0.44),
    ("wild", 0.1, 0.4),
    ("wonderful", 1.0, 1.0),
    ("worse", -0.4, 0.6),
    ("worst", -1.0, 1.0),
    ("wrong", -0.5, 0.9),
    ("young", 0.1, 0.4),
];

/// (word, multiplier) applied to the next lexicon word
pub(super) const INTENSIFIERS: &[(&str, f64)] = &[
    ("extremely", 1.5),
    ("really", 1.3),
    ("so", 1.2),
    ("too", 1.2),
    ("totally", 1.4),
    ("very", 1.3),
];

pub(super) const NEGATIONS: &[&str] = &[
    "ain't", "aint", "can't", "cant", "didn't", "don't", "dont", "isn't", "never", "no", "not",
    "won't", "wasn't",
];
