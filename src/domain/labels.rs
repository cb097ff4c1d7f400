//! Code ↔ label tables for the categorical form fields.
//!
//! The model consumes short categorical codes (`M`, `N`, `A0001`, ...), while
//! the form shows human-readable labels. Each table is a closed enum, so a
//! value chosen in the form can never be outside the table. Free text (CLI
//! flags) goes through [`parse_choice`].
//!
//! Marital status and issue state have no friendly label: the code is shown
//! as-is.

/// A categorical field with a fixed, ordered set of values.
pub trait Coded: Copy + Eq + Sized + 'static {
    /// Every value, in display order.
    const ALL: &'static [Self];

    /// Internal code sent to the model.
    fn code(self) -> &'static str;

    /// Display label shown in the form.
    fn label(self) -> &'static str;

    fn from_code(code: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|v| v.code() == code)
    }

    fn from_label(label: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|v| v.label() == label)
    }

    /// Position in display order.
    fn index(self) -> usize {
        Self::ALL.iter().position(|v| *v == self).unwrap_or(0)
    }

    /// Next value in display order (wraps).
    fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    /// Previous value in display order (wraps).
    fn prev(self) -> Self {
        let n = Self::ALL.len();
        Self::ALL[(self.index() + n - 1) % n]
    }
}

macro_rules! coded_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $( $variant:ident => ($code:literal, $label:literal) ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $( $variant ),+
        }

        impl Coded for $name {
            const ALL: &'static [Self] = &[$( $name::$variant ),+];

            fn code(self) -> &'static str {
                match self {
                    $( $name::$variant => $code ),+
                }
            }

            fn label(self) -> &'static str {
                match self {
                    $( $name::$variant => $label ),+
                }
            }
        }

        impl Default for $name {
            /// The form preselects the first entry.
            fn default() -> Self {
                Self::ALL[0]
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.label())
            }
        }
    };
}

coded_enum! {
    /// Applicant sex.
    pub enum Sex {
        Male => ("M", "Male"),
        Female => ("F", "Female"),
    }
}

coded_enum! {
    /// Smoking class used for underwriting.
    pub enum SmokingClass {
        Smoker => ("S", "Smoker"),
        NonSmoker => ("N", "Non-smoker"),
    }
}

coded_enum! {
    /// Marital status (identity mapping).
    pub enum MaritalStatus {
        Single => ("single", "single"),
        Married => ("married", "married"),
        Divorced => ("divorced", "divorced"),
    }
}

coded_enum! {
    /// Insurance product.
    pub enum Product {
        BasicLife => ("A0001", "Basic Life Insurance"),
        PremiumLife => ("A0002", "Premium Life Insurance"),
        FamilyLife => ("A0003", "Family Life Insurance"),
        SeniorLife => ("A0004", "Senior Life Insurance"),
    }
}

coded_enum! {
    /// US state/territory the policy is issued in (pass-through codes).
    ///
    /// The order matches the category order the production model was trained
    /// with, not alphabetical order.
    pub enum IssueState {
        Nd => ("ND", "ND"),
        Mn => ("MN", "MN"),
        Pa => ("PA", "PA"),
        Md => ("MD", "MD"),
        Fl => ("FL", "FL"),
        Nv => ("NV", "NV"),
        Wi => ("WI", "WI"),
        Ut => ("UT", "UT"),
        Mt => ("MT", "MT"),
        Ms => ("MS", "MS"),
        De => ("DE", "DE"),
        Mi => ("MI", "MI"),
        Sd => ("SD", "SD"),
        Ct => ("CT", "CT"),
        Nm => ("NM", "NM"),
        Al => ("AL", "AL"),
        Ne => ("NE", "NE"),
        Oh => ("OH", "OH"),
        Il => ("IL", "IL"),
        Ma => ("MA", "MA"),
        Ak => ("AK", "AK"),
        Ar => ("AR", "AR"),
        Ga => ("GA", "GA"),
        In => ("IN", "IN"),
        Ca => ("CA", "CA"),
        Nh => ("NH", "NH"),
        Or => ("OR", "OR"),
        Co => ("CO", "CO"),
        Ks => ("KS", "KS"),
        Nc => ("NC", "NC"),
        Me => ("ME", "ME"),
        Nj => ("NJ", "NJ"),
        Az => ("AZ", "AZ"),
        Hi => ("HI", "HI"),
        Wa => ("WA", "WA"),
        Wv => ("WV", "WV"),
        Id => ("ID", "ID"),
        Va => ("VA", "VA"),
        Tx => ("TX", "TX"),
        La => ("LA", "LA"),
        Ky => ("KY", "KY"),
        Ri => ("RI", "RI"),
        Tn => ("TN", "TN"),
        Wy => ("WY", "WY"),
        Mo => ("MO", "MO"),
        Sc => ("SC", "SC"),
        Ia => ("IA", "IA"),
        Ok => ("OK", "OK"),
        Ny => ("NY", "NY"),
        Vt => ("VT", "VT"),
        Dc => ("DC", "DC"),
    }
}

/// Parse free text into a table value.
///
/// Accepts the exact label, the exact code, or the label ignoring ASCII case
/// (so `--smoking non-smoker` works). Used as a clap value parser.
pub fn parse_choice<T: Coded>(input: &str) -> Result<T, String> {
    let input = input.trim();
    if let Some(v) = T::from_label(input).or_else(|| T::from_code(input)) {
        return Ok(v);
    }
    if let Some(v) = T::ALL
        .iter()
        .copied()
        .find(|v| v.label().eq_ignore_ascii_case(input) || v.code().eq_ignore_ascii_case(input))
    {
        return Ok(v);
    }

    let choices = T::ALL.iter().map(|v| v.label()).collect::<Vec<_>>().join(", ");
    Err(format!("unknown value '{input}' (expected one of: {choices})"))
}
