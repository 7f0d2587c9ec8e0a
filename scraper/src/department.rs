use std::{fmt, str::FromStr};

use enum_iterator::Sequence;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("unknown department code {0:?}")]
pub struct UnknownDepartment(String);

macro_rules! departments {
    ($($variant:ident => $code:literal,)*) => {
        /// Academic units whose class listings are published on the class-search site.
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Sequence)]
        pub enum Department {
            $($variant,)*
        }

        impl Department {
            pub fn code(self) -> &'static str {
                match self {
                    $(Self::$variant => $code,)*
                }
            }
        }

        impl FromStr for Department {
            type Err = UnknownDepartment;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.to_ascii_lowercase().as_str() {
                    $($code => Ok(Self::$variant),)*
                    _ => Err(UnknownDepartment(s.to_owned())),
                }
            }
        }
    };
}

departments! {
    Csci => "csci",
    Math => "math",
    Buad => "buad",
    Econ => "econ",
    Engr => "engr",
    Psyc => "psyc",
    Comm => "comm",
    Bisc => "bisc",
    Acct => "acct",
    Ahis => "ahis",
    Amst => "amst",
    Anth => "anth",
    Astr => "astr",
    Bioc => "bioc",
    Chem => "chem",
    Clas => "clas",
    Engl => "engl",
    Fren => "fren",
    Geog => "geog",
    Germ => "germ",
    Hist => "hist",
    Ital => "ital",
    Ling => "ling",
    Phil => "phil",
    Phys => "phys",
    Poir => "poir",
    Soci => "soci",
    Span => "span",
    Art => "art",
    Arth => "arth",
    Asc => "asc",
    Baep => "baep",
    Biol => "biol",
    Bme => "bme",
    Ce => "ce",
    Cmgt => "cmgt",
    Ctin => "ctin",
    Dsci => "dsci",
    Ealc => "ealc",
    Ee => "ee",
    Fbe => "fbe",
    Geol => "geol",
    Gero => "gero",
    Hbio => "hbio",
    Iml => "iml",
    Ir => "ir",
    Itp => "itp",
    Jour => "jour",
    Law => "law",
    Lim => "lim",
    Masc => "masc",
    Mda => "mda",
    Mech => "mech",
    Mpw => "mpw",
    Mptx => "mptx",
    Ms => "ms",
    Musc => "musc",
    Naut => "naut",
    Neur => "neur",
    Nsci => "nsci",
    Ppe => "ppe",
    Phed => "phed",
    Ppa => "ppa",
    Ppd => "ppd",
    Pte => "pte",
    Ptx => "ptx",
    Rel => "rel",
    Rus => "rus",
    Swms => "swms",
    Thtr => "thtr",
    Visi => "visi",
    Writ => "writ",
}

impl Department {
    /// Every known department, in listing order.
    pub fn all() -> impl Iterator<Item = Self> {
        enum_iterator::all::<Self>()
    }

    /// Name of the raw download for this department, e.g. `csci_classes.csv`.
    pub fn file_name(self) -> String {
        format!("{}_classes.csv", self.code())
    }
}

impl fmt::Display for Department {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn codes_are_unique() {
        let codes: Vec<_> = Department::all().map(Department::code).collect();
        let unique: HashSet<_> = codes.iter().collect();
        assert_eq!(codes.len(), unique.len());
        assert_eq!(codes.len(), 72);
    }

    #[test]
    fn parses_its_own_code() {
        for department in Department::all() {
            assert_eq!(department.code().parse::<Department>().unwrap(), department);
        }
        assert_eq!("CSCI".parse::<Department>().unwrap(), Department::Csci);
        assert!("xyz".parse::<Department>().is_err());
    }

    #[test]
    fn file_name_uses_lowercase_code() {
        assert_eq!(Department::Ee.file_name(), "ee_classes.csv");
    }
}
