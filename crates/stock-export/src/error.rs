use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("没有可导出的股票数据")]
    NoData,

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ExportResult<T> = Result<T, ExportError>;
