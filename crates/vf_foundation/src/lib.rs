// volflux\crates\vf_foundation\src/lib.rs

//! VolFlux Foundation Layer
//!
//! 基础层，提供字段核心之下的两块地基：物理量纲与持久记录。
//!
//! # 模块概览
//!
//! - [`dimension`]: 运行期物理量纲描述与一致性检查
//! - [`record`]: 键值树持久记录抽象（编码无关）
//!
//! # 设计原则
//!
//! 1. **最小依赖**: 仅依赖 serde、thiserror 与 log
//! 2. **运行期量纲**: 量纲作为数据随值传递，逐运算检查而非编译期类型
//! 3. **编码无关**: 记录只定义结构，具体序列化格式由外围 IO 层选择
//!
//! # 示例
//!
//! ```
//! use vf_foundation::{
//!     dimension::{dims, Dimensioned},
//!     record::Record,
//! };
//!
//! // 带量纲常量
//! let g = Dimensioned::new("g", dims::ACCELERATION, 9.81);
//! assert_eq!(g.dimensions(), dims::ACCELERATION);
//!
//! // 结构化记录
//! let mut rec = Record::new();
//! rec.put_scalar("g", *g.value());
//! assert!(rec.contains("g"));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod dimension;
pub mod record;

// 重导出常用类型
pub use dimension::{dims, DimensionError, DimensionSet, Dimensioned};
pub use record::{Record, RecordError, RecordValue};

/// Prelude 模块，包含常用类型
pub mod prelude {
    pub use crate::dimension::{
        dims, dimension_checking, set_dimension_checking, DimensionChecking, DimensionError,
        DimensionSet, Dimensioned,
    };
    pub use crate::record::{Record, RecordError, RecordValue};
}
