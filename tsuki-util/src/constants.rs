// API endpoints
pub const GITHUB_USERS: &str = "https://api.github.com/users";
pub const GITHUB_REPO_SEARCH: &str = "https://api.github.com/search/repositories";

/// Amount of repositories requested per github search.
pub const GITHUB_REPO_SEARCH_LIMIT: usize = 11;

// Colors
pub const INVISIBLE_COLOR: u32 = 0x36393F;

/// Anime genres and their jikan ids.
pub const GENRES: [(&str, u8); 14] = [
    ("Action", 1),
    ("Adventure", 2),
    ("Drama", 8),
    ("Demons", 6),
    ("Ecchi", 9),
    ("Sci-Fi", 24),
    ("Shounen", 27),
    ("Harem", 35),
    ("Seinen", 42),
    ("Samurai", 21),
    ("Games", 11),
    ("Psychological", 40),
    ("Super Power", 37),
    ("Vampire", 32),
];

/// Look up the jikan id of a genre, case-insensitive.
pub fn genre_id(name: &str) -> Option<u8> {
    GENRES
        .iter()
        .find(|(genre, _)| genre.eq_ignore_ascii_case(name))
        .map(|(_, id)| *id)
}
