#[derive(Copy, Clone, Debug, Default, Eq, Hash, PartialEq)]
#[repr(u8)]
pub enum Site {
    Github,
    #[default]
    Other,
}

impl Site {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Github => "Github",
            Self::Other => "Other",
        }
    }
}
