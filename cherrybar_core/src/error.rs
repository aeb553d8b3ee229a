use std::num::ParseIntError;

#[derive(thiserror::Error, Debug)]
pub enum GameError {
    #[error("invalid balance `{input}`: {source}")]
    InvalidBalance {
        input: String,
        #[source]
        source: ParseIntError,
    },
    #[error("balance cannot be edited while fixed mode is on")]
    BalanceLocked,
    #[error("symbol index {0} is outside 0..=9")]
    SymbolOutOfRange(u8),
    #[error("invalid config: {0}")]
    Config(String),
}

pub type GameResult<T> = Result<T, GameError>;
