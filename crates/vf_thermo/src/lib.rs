// volflux\crates\vf_thermo\src/lib.rs

//! VolFlux 热物性层
//!
//! 字段层的第一个下游消费者：进度变量驱动的双端态混合模型。
//! 反应物与产物各由一张量热完全的端态表描述，单元或边界面上的
//! 进度变量从 [`vf_field::GeometricField`] 取出后按摩尔分数混合。
//!
//! # 模块概览
//!
//! - [`table`]: 端态热物性表（摩尔质量、热容、焓偏移）
//! - [`mixture`]: 双端态混合模型与进度变量阈值
//! - [`error`]: 热物性层错误类型
//!
//! # 用法
//!
//! ```
//! use std::sync::Arc;
//! use vf_foundation::dimension::dims;
//! use vf_mesh::SimpleMesh;
//! use vf_field::GeometricField;
//! use vf_thermo::{HomogeneousMixture, ThermoTable};
//!
//! let mix = HomogeneousMixture::new(
//!     ThermoTable::new("reactants", 29.4, 1007.0, 0.0),
//!     ThermoTable::new("products", 28.3, 1220.0, -2.45e6),
//! )?;
//!
//! let mesh = Arc::new(SimpleMesh::line(8));
//! let b = GeometricField::with_value("b", mesh, dims::DIMLESS, 0.5).unwrap();
//!
//! let local = mix.cell_mixture(&b, 3);
//! assert!(local.heat_capacity > mix.reactants().heat_capacity);
//! # Ok::<(), vf_thermo::MixtureError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod mixture;
pub mod table;

// 重导出常用类型
pub use error::{MixtureError, MixtureResult};
pub use mixture::{HomogeneousMixture, COLD_LIMIT, HOT_LIMIT};
pub use table::{ThermoTable, UNIVERSAL_GAS_CONSTANT};

/// Prelude 模块，包含常用类型
pub mod prelude {
    pub use crate::error::{MixtureError, MixtureResult};
    pub use crate::mixture::HomogeneousMixture;
    pub use crate::table::ThermoTable;
}
