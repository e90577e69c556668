// crates/vf_thermo/src/mixture.rs

//! HomogeneousMixture - 进度变量驱动的双端态混合模型
//!
//! 预混燃烧的回归变量 b 约定：b = 1 为未燃端（反应物），b = 0 为
//! 完全燃烧端（产物）。中间状态按摩尔分数插值两张端态表：
//!
//! ```text
//! w_r = b / W_r        w_p = (1 - b) / W_p
//! 性质 = (w_r · 反应物性质 + w_p · 产物性质) / (w_r + w_p)
//! ```
//!
//! 权重以摩尔质量的倒数归一，混合摩尔质量即 1/(w_r + w_p)，
//! 与质量分数混合律一致。b 超出 [`COLD_LIMIT`], [`HOT_LIMIT`]
//! 所夹的区间时直接取端态表，不做插值。
//!
//! 模型按组分索引提供端态访问：0 为反应物，1 为产物，越界
//! 返回 [`MixtureError::UnknownSpecieIndex`]。

use serde::{Deserialize, Serialize};
use vf_field::GeometricField;
use vf_foundation::record::Record;
use vf_mesh::MeshAccess;

use crate::error::{MixtureError, MixtureResult};
use crate::table::ThermoTable;

/// 热端阈值：b 高于此值按纯反应物处理
pub const HOT_LIMIT: f64 = 0.999;

/// 冷端阈值：b 低于此值按纯产物处理
pub const COLD_LIMIT: f64 = 0.001;

/// 双端态均匀混合模型
///
/// 持有反应物与产物两张端态表，按进度变量在两者之间混合。
/// 构造与读取都会校验两张表（摩尔质量必须为有限正值）。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HomogeneousMixture {
    reactants: ThermoTable,
    products: ThermoTable,
}

impl HomogeneousMixture {
    /// 由两张端态表构造，表参数非法时拒绝
    pub fn new(reactants: ThermoTable, products: ThermoTable) -> MixtureResult<Self> {
        reactants.validate()?;
        products.validate()?;
        Ok(Self {
            reactants,
            products,
        })
    }

    /// 从持久记录读取，两张表分别在子记录 "reactants" 与 "products" 里
    pub fn read(rec: &Record) -> MixtureResult<Self> {
        let reactants = Self::read_table(rec, "reactants")?;
        let products = Self::read_table(rec, "products")?;
        Self::new(reactants, products)
    }

    /// 重读两张端态表，原位更新
    ///
    /// 两张表都读取成功才落盘，任何一张失败则保持原状。
    pub fn reread(&mut self, rec: &Record) -> MixtureResult<()> {
        let reactants = Self::read_table(rec, "reactants")?;
        let products = Self::read_table(rec, "products")?;
        reactants.validate()?;
        products.validate()?;
        self.reactants = reactants;
        self.products = products;
        Ok(())
    }

    fn read_table(rec: &Record, key: &'static str) -> MixtureResult<ThermoTable> {
        let sub = rec
            .get_record(key)
            .map_err(|e| MixtureError::read(key, e))?;
        ThermoTable::read(key, sub)
    }

    /// 写出到持久记录
    pub fn write(&self, rec: &mut Record) {
        let mut reactants = Record::new();
        self.reactants.write(&mut reactants);
        rec.put_record("reactants", reactants);

        let mut products = Record::new();
        self.products.write(&mut products);
        rec.put_record("products", products);
    }

    // ============================================================
    // 端态访问
    // ============================================================

    /// 反应物端态表
    pub fn reactants(&self) -> &ThermoTable {
        &self.reactants
    }

    /// 产物端态表
    pub fn products(&self) -> &ThermoTable {
        &self.products
    }

    /// 端态数（组分索引的开区间上界）
    pub fn n_species(&self) -> usize {
        2
    }

    /// 按组分索引取端态表：0 为反应物，1 为产物
    pub fn local_thermo(&self, specie: usize) -> MixtureResult<&ThermoTable> {
        match specie {
            0 => Ok(&self.reactants),
            1 => Ok(&self.products),
            _ => Err(MixtureError::unknown_specie(specie, self.n_species() - 1)),
        }
    }

    // ============================================================
    // 混合
    // ============================================================

    /// 按进度变量 b 混合两张端态表
    ///
    /// b 高于 [`HOT_LIMIT`] 返回反应物表的副本，低于 [`COLD_LIMIT`]
    /// 返回产物表的副本（名字保留端态名）；区间内按摩尔分数
    /// 插值，结果命名为 "mixture"。
    pub fn mixture(&self, b: f64) -> ThermoTable {
        if b > HOT_LIMIT {
            return self.reactants.clone();
        }
        if b < COLD_LIMIT {
            return self.products.clone();
        }

        let w_r = b / self.reactants.molar_weight;
        let w_p = (1.0 - b) / self.products.molar_weight;
        let sum = w_r + w_p;

        ThermoTable {
            name: "mixture".to_string(),
            // w_r·W_r + w_p·W_p = b + (1 - b) = 1
            molar_weight: 1.0 / sum,
            heat_capacity: (w_r * self.reactants.heat_capacity
                + w_p * self.products.heat_capacity)
                / sum,
            enthalpy_offset: (w_r * self.reactants.enthalpy_offset
                + w_p * self.products.enthalpy_offset)
                / sum,
        }
    }

    /// 按单元序号从进度变量场取 b 并混合
    pub fn cell_mixture<M: MeshAccess>(
        &self,
        progress: &GeometricField<f64, M>,
        cell: usize,
    ) -> ThermoTable {
        self.mixture(progress.values()[cell])
    }

    /// 按片序号与片内面序号从进度变量场的边界取 b 并混合
    pub fn patch_face_mixture<M: MeshAccess>(
        &self,
        progress: &GeometricField<f64, M>,
        patch: usize,
        face: usize,
    ) -> ThermoTable {
        self.mixture(progress.boundary().patch(patch).values()[face])
    }
}
