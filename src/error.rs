//! Ошибки генерации доски.
//!
//! Фатальна только категория предусловий: некорректные параметры построения
//! и несовпадающие размерности шумовых слоёв. Промахи поиска по координатам
//! и недостижимые цели маршрута ошибками не являются и возвращаются как
//! `Option::None`.

#[derive(Debug, thiserror::Error)]
pub enum GenError {
    #[error("invalid board parameters: {reason}")]
    Precondition { reason: String },

    #[error("field dimension mismatch: {width_a}x{height_a} vs {width_b}x{height_b}")]
    DimensionMismatch {
        width_a: u32,
        height_a: u32,
        width_b: u32,
        height_b: u32,
    },
}

pub type Result<T> = std::result::Result<T, GenError>;
