//! # Domain Services
//!
//! 複数のエンティティにまたがる純粋なビジネスルール
//!
//! - **header_aliases**: ヘッダー別名の対応表
//! - **row_validator**: 行の構造検証
//! - **result_collector**: 行結果の集計

pub mod header_aliases;
pub mod result_collector;
pub mod row_validator;
