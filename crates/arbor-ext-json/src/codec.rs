//! JSON codecs for models and contracts.

use serde::{de::DeserializeOwned, Serialize};

use arbor_core::ArborResult;
use arbor_lattice::{LatticeModel, ModelSnapshot};
use arbor_pricing::OptionContract;

use crate::records::ContractRecord;

/// JSON codec using serde_json.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec {
    pretty: bool,
}

impl JsonCodec {
    /// Create a compact JSON codec.
    pub fn new() -> Self {
        Self { pretty: false }
    }

    /// Create a pretty-printing JSON codec.
    pub fn pretty() -> Self {
        Self { pretty: true }
    }

    /// Encode any serializable value.
    pub fn encode<T: Serialize>(&self, value: &T) -> ArborResult<String> {
        let text = if self.pretty {
            serde_json::to_string_pretty(value)?
        } else {
            serde_json::to_string(value)?
        };
        Ok(text)
    }

    /// Decode any deserializable value.
    pub fn decode<T: DeserializeOwned>(&self, text: &str) -> ArborResult<T> {
        Ok(serde_json::from_str(text)?)
    }

    /// Encode a model as `{steps, dt, rates, volatilities}`.
    pub fn encode_model(&self, model: &LatticeModel) -> ArborResult<String> {
        self.encode(&model.snapshot())
    }

    /// Decode a model and rebuild its branches.
    ///
    /// Shape errors surface as serialization errors; a well-formed document
    /// with invalid contents (zero steps, mismatched lengths) surfaces as a
    /// configuration error.
    pub fn decode_model(&self, text: &str) -> ArborResult<LatticeModel> {
        let snapshot: ModelSnapshot = self.decode(text)?;
        LatticeModel::from_snapshot(snapshot)
    }

    /// Encode a contract's economics. The attached model is not included.
    pub fn encode_contract(&self, contract: &OptionContract) -> ArborResult<String> {
        self.encode(&ContractRecord::from(contract))
    }

    /// Decode a contract. The result has no model attached.
    pub fn decode_contract(&self, text: &str) -> ArborResult<OptionContract> {
        let record: ContractRecord = self.decode(text)?;
        OptionContract::try_from(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arbor_core::{ArborError, OptionSide};
    use arbor_pricing::ContractKind;

    #[test]
    fn test_model_format() {
        let model = LatticeModel::flat(2, 1.0, 0.05, 0.2).unwrap();
        let json = JsonCodec::new().encode_model(&model).unwrap();
        assert_eq!(
            json,
            r#"{"steps":2,"dt":0.5,"rates":[0.05,0.05],"volatilities":[0.2,0.2]}"#
        );
    }

    #[test]
    fn test_template_writes_sentinel() {
        let template = LatticeModel::flat_template(1, 0.05, 0.2).unwrap();
        let json = JsonCodec::new().encode_model(&template).unwrap();
        assert!(json.contains(r#""dt":-1.0"#));

        let restored = JsonCodec::new().decode_model(&json).unwrap();
        assert!(!restored.is_bound());
    }

    #[test]
    fn test_model_decode_rebuilds_branches() {
        let json = r#"{"steps":1,"dt":1.0,"rates":[0.05],"volatilities":[0.2]}"#;
        let model = JsonCodec::new().decode_model(json).unwrap();
        assert_eq!(model.branches().len(), 1);
        assert!((model.branches()[0][0].up_prob - 0.5775).abs() < 1e-4);
    }

    #[test]
    fn test_model_errors() {
        let codec = JsonCodec::new();
        let missing = codec.decode_model(r#"{"steps":1,"dt":1.0,"rates":[0.05]}"#);
        assert!(matches!(missing, Err(ArborError::Serialization { .. })));

        let mismatched =
            codec.decode_model(r#"{"steps":2,"dt":1.0,"rates":[0.05],"volatilities":[0.2]}"#);
        assert!(mismatched.unwrap_err().is_configuration());
    }

    #[test]
    fn test_contract_roundtrip() {
        let contract =
            OptionContract::new(120.0, 110.0, 0.75, OptionSide::Put, ContractKind::American)
                .unwrap()
                .with_underlying("NVDA")
                .with_currency("USD");

        let codec = JsonCodec::pretty();
        let json = codec.encode_contract(&contract).unwrap();
        assert!(json.contains('\n'));

        let restored = codec.decode_contract(&json).unwrap();
        assert_eq!(restored, contract);
    }
}
