use serde::{Deserialize, Serialize};

/// Exchange board of an A-share stock, decided by its code prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Board {
    /// 创业板, codes starting with 300
    ChiNext,
    /// 科创板, codes starting with 688
    Star,
    /// 主板
    Main,
}

impl Board {
    /// Classify a code such as `sz.300001` or `688001`. Empty codes have no board.
    pub fn from_code(code: &str) -> Option<Self> {
        if code.is_empty() {
            return None;
        }
        // strip the exchange prefix
        let digits = code.rsplit('.').next().unwrap_or(code);
        Some(if digits.starts_with("300") {
            Board::ChiNext
        } else if digits.starts_with("688") {
            Board::Star
        } else {
            Board::Main
        })
    }

    pub fn label(&self) -> &'static str {
        match self {
            Board::ChiNext => "创业板",
            Board::Star => "科创板",
            Board::Main => "主板",
        }
    }
}

pub fn is_chinext(code: &str) -> bool {
    Board::from_code(code) == Some(Board::ChiNext)
}

pub fn is_star(code: &str) -> bool {
    Board::from_code(code) == Some(Board::Star)
}

pub fn is_main_board(code: &str) -> bool {
    Board::from_code(code) == Some(Board::Main)
}
