use std::fmt;

/// Possible errors encountered while configuring a Predictor.
#[derive(Debug)]
pub enum ConfigError {
    InvalidMemory(String),
}
impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidMemory(mem) => {
                write!(f, "
                    \r{mem} is not a valid memory option.\n
                    \rMemory Options:\n
                    \r-mem 0  54 MB   -mem 5  118 MB
                    \r-mem 1  56 MB   -mem 6  182 MB
                    \r-mem 2  60 MB   -mem 7  310 MB
                    \r-mem 3  69 MB   -mem 8  566 MB
                    \r-mem 4  86 MB   -mem 9  1078 MB\n"
                )
            }
        }
    }
}
