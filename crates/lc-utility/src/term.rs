//! The closed set of utility term kinds a spec row can reference.
//!
//! Spec files name a term with a short token in their `Expression` column:
//!
//! | Token                         | Value for a (chooser, zone) row                   |
//! |-------------------------------|---------------------------------------------------|
//! | `1`                           | `1`                                               |
//! | `chooser:<col>`               | person covariate                                  |
//! | `alt:<col>`                   | land-use column of the zone                       |
//! | `chooser:<a>*alt:<b>`         | product of the two                                |
//! | `skim:<key>`                  | skim from home zone to the zone                   |
//! | `same_zone`                   | `1` if the zone is the home zone                  |
//! | `ln_size`                     | `ln(size term)`, `0` for empty zones              |
//! | `no_attraction`               | `1` if the size term is zero                      |
//! | `mode_choice_logsum`          | logsum attached by the augmenter                  |
//! | `sample_correction`           | `ln(pick_count / prob)`                           |

use std::fmt;
use std::str::FromStr;

use crate::UtilityError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Term {
    Constant,
    Chooser(String),
    Alternative(String),
    Interaction { chooser: String, alternative: String },
    Skim(String),
    SameZone,
    LnSize,
    NoAttraction,
    Logsum,
    SampleCorrection,
}

impl FromStr for Term {
    type Err = UtilityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let term = match s {
            "1" => Term::Constant,
            "same_zone" => Term::SameZone,
            "ln_size" => Term::LnSize,
            "no_attraction" => Term::NoAttraction,
            "mode_choice_logsum" => Term::Logsum,
            "sample_correction" => Term::SampleCorrection,
            _ => {
                if let Some((left, right)) = s.split_once('*') {
                    match (prefixed(left, "chooser:"), prefixed(right, "alt:")) {
                        (Some(c), Some(a)) => Term::Interaction {
                            chooser:     c.to_owned(),
                            alternative: a.to_owned(),
                        },
                        _ => return Err(unknown(s)),
                    }
                } else if let Some(c) = prefixed(s, "chooser:") {
                    Term::Chooser(c.to_owned())
                } else if let Some(a) = prefixed(s, "alt:") {
                    Term::Alternative(a.to_owned())
                } else if let Some(k) = prefixed(s, "skim:") {
                    Term::Skim(k.to_owned())
                } else {
                    return Err(unknown(s));
                }
            }
        };
        Ok(term)
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Constant         => f.write_str("1"),
            Term::Chooser(c)       => write!(f, "chooser:{c}"),
            Term::Alternative(a)   => write!(f, "alt:{a}"),
            Term::Interaction { chooser, alternative } => {
                write!(f, "chooser:{chooser}*alt:{alternative}")
            }
            Term::Skim(k)          => write!(f, "skim:{k}"),
            Term::SameZone         => f.write_str("same_zone"),
            Term::LnSize           => f.write_str("ln_size"),
            Term::NoAttraction     => f.write_str("no_attraction"),
            Term::Logsum           => f.write_str("mode_choice_logsum"),
            Term::SampleCorrection => f.write_str("sample_correction"),
        }
    }
}

fn prefixed<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    s.trim()
        .strip_prefix(prefix)
        .map(str::trim)
        .filter(|rest| !rest.is_empty())
}

fn unknown(s: &str) -> UtilityError {
    UtilityError::Parse(format!("unknown expression {s:?}"))
}
