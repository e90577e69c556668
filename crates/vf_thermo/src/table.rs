// crates/vf_thermo/src/table.rs

//! ThermoTable - 单一端态的热物性表
//!
//! 量热完全气体（比热为常数）的最小参数集：摩尔质量、比定压热容、
//! 生成焓偏移。混合模型在两张这样的表之间按进度变量插值。
//! 表本身是开放的数据记录，持久化走 [`Record`]，配置走 serde。

use serde::{Deserialize, Serialize};
use vf_foundation::record::Record;

use crate::error::{MixtureError, MixtureResult};

/// 通用气体常数 [J/(kmol·K)]
pub const UNIVERSAL_GAS_CONSTANT: f64 = 8314.462618;

/// 单一端态的热物性表
///
/// 三个参数确定一个量热完全气体：
///
/// - `molar_weight`: 摩尔质量 [kg/kmol]，混合权重的分母，必须为正
/// - `heat_capacity`: 比定压热容 [J/(kg·K)]
/// - `enthalpy_offset`: 生成焓偏移 [J/kg]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThermoTable {
    /// 表名（端态名，如 "reactants"）
    pub name: String,

    /// 摩尔质量 [kg/kmol]
    pub molar_weight: f64,

    /// 比定压热容 [J/(kg·K)]
    #[serde(default)]
    pub heat_capacity: f64,

    /// 生成焓偏移 [J/kg]
    #[serde(default)]
    pub enthalpy_offset: f64,
}

impl ThermoTable {
    /// 构造端态表
    pub fn new(
        name: impl Into<String>,
        molar_weight: f64,
        heat_capacity: f64,
        enthalpy_offset: f64,
    ) -> Self {
        Self {
            name: name.into(),
            molar_weight,
            heat_capacity,
            enthalpy_offset,
        }
    }

    /// 比气体常数 R/W [J/(kg·K)]
    pub fn gas_constant(&self) -> f64 {
        UNIVERSAL_GAS_CONSTANT / self.molar_weight
    }

    /// 比焓 h(T) = Cp·T + h_f [J/kg]
    pub fn enthalpy(&self, temperature: f64) -> f64 {
        self.heat_capacity * temperature + self.enthalpy_offset
    }

    /// 校验参数有效性
    ///
    /// 摩尔质量作混合权重的分母，必须为有限正值；
    /// 热容与焓偏移只要求有限。
    pub fn validate(&self) -> MixtureResult<()> {
        if !(self.molar_weight.is_finite() && self.molar_weight > 0.0) {
            return Err(MixtureError::invalid_table(
                &self.name,
                "摩尔质量必须为有限正值",
            ));
        }
        if !self.heat_capacity.is_finite() {
            return Err(MixtureError::invalid_table(&self.name, "热容必须有限"));
        }
        if !self.enthalpy_offset.is_finite() {
            return Err(MixtureError::invalid_table(&self.name, "焓偏移必须有限"));
        }
        Ok(())
    }

    /// 从持久记录读取端态表
    ///
    /// `name` 既是表名也是错误上下文；记录中缺键或类型不符时
    /// 返回 [`MixtureError::Read`]，参数非法时返回校验错误。
    pub fn read(name: impl Into<String>, rec: &Record) -> MixtureResult<Self> {
        let name = name.into();
        let molar_weight = rec
            .get_scalar("molar_weight")
            .map_err(|e| MixtureError::read(name.clone(), e))?;
        let heat_capacity = rec
            .get_scalar("heat_capacity")
            .map_err(|e| MixtureError::read(name.clone(), e))?;
        let enthalpy_offset = rec
            .get_scalar("enthalpy_offset")
            .map_err(|e| MixtureError::read(name.clone(), e))?;

        let table = Self {
            name,
            molar_weight,
            heat_capacity,
            enthalpy_offset,
        };
        table.validate()?;
        Ok(table)
    }

    /// 写出到持久记录
    ///
    /// 表名由所在的上层键承载，记录内只存三个参数。
    pub fn write(&self, rec: &mut Record) {
        rec.put_scalar("molar_weight", self.molar_weight);
        rec.put_scalar("heat_capacity", self.heat_capacity);
        rec.put_scalar("enthalpy_offset", self.enthalpy_offset);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stoichiometric_air_fuel() -> ThermoTable {
        ThermoTable::new("reactants", 29.4, 1007.0, 0.0)
    }

    #[test]
    fn test_enthalpy_is_linear_in_temperature() {
        let t = ThermoTable::new("products", 28.3, 1220.0, -2.45e6);
        assert!((t.enthalpy(0.0) - (-2.45e6)).abs() < 1e-6);
        assert!((t.enthalpy(300.0) - (1220.0 * 300.0 - 2.45e6)).abs() < 1e-6);
    }

    #[test]
    fn test_gas_constant_from_molar_weight() {
        let t = stoichiometric_air_fuel();
        assert!((t.gas_constant() - UNIVERSAL_GAS_CONSTANT / 29.4).abs() < 1e-9);
    }

    #[test]
    fn test_validate_rejects_non_positive_weight() {
        let mut t = stoichiometric_air_fuel();
        t.molar_weight = 0.0;
        assert!(matches!(
            t.validate(),
            Err(MixtureError::InvalidTable { .. })
        ));

        t.molar_weight = -1.0;
        assert!(t.validate().is_err());

        t.molar_weight = f64::NAN;
        assert!(t.validate().is_err());
    }

    #[test]
    fn test_record_round_trip() {
        let t = stoichiometric_air_fuel();
        let mut rec = Record::new();
        t.write(&mut rec);

        let restored = ThermoTable::read("reactants", &rec).unwrap();
        assert_eq!(restored, t);
    }

    #[test]
    fn test_read_missing_key_names_table() {
        let rec = Record::new();
        let err = ThermoTable::read("products", &rec).unwrap_err();
        assert!(err.to_string().contains("products"));
    }

    #[test]
    fn test_serde_round_trip() {
        let t = stoichiometric_air_fuel();
        let json = serde_json::to_string(&t).unwrap();
        let parsed: ThermoTable = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, t);
    }
}
