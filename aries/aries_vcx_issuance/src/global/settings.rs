use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

use crate::errors::error::prelude::*;

pub const CONFIG_AUTO_STORE_CREDENTIAL: &str = "debug.auto_store_credential";
pub const CONFIG_AUTO_RESPOND_CREDENTIAL_OFFER: &str = "debug.auto_respond_credential_offer";
pub const CONFIG_LOG_EXCHANGE_EVENTS: &str = "debug.log_exchange_events";

/// Holder options, handed to every handler call.
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, PartialEq, Eq, TypedBuilder)]
#[serde(default)]
pub struct HolderConfig {
    #[builder(default)]
    pub auto_store_credential: bool,
    #[builder(default)]
    pub auto_respond_credential_offer: bool,
    #[builder(default)]
    pub log_exchange_events: bool,
}

impl HolderConfig {
    pub fn from_json(config: &str) -> VcxIssuanceResult<Self> {
        trace!("HolderConfig::from_json >>> config: {}", config);
        serde_json::from_str(config).map_err(|err| {
            AriesVcxIssuanceError::from_msg(
                AriesVcxIssuanceErrorKind::InvalidConfiguration,
                format!("Cannot parse holder config: {err}"),
            )
        })
    }

    /// Reads the `debug.*` keys of a flat settings map. Absent keys keep their default.
    pub fn from_settings(settings: &HashMap<String, String>) -> VcxIssuanceResult<Self> {
        let flag = |key: &str| -> VcxIssuanceResult<bool> {
            match settings.get(key) {
                None => Ok(false),
                Some(value) => value.trim().parse::<bool>().map_err(|_| {
                    AriesVcxIssuanceError::from_msg(
                        AriesVcxIssuanceErrorKind::InvalidConfiguration,
                        format!("Setting {key} must be true or false, found {value:?}"),
                    )
                }),
            }
        };

        Ok(Self {
            auto_store_credential: flag(CONFIG_AUTO_STORE_CREDENTIAL)?,
            auto_respond_credential_offer: flag(CONFIG_AUTO_RESPOND_CREDENTIAL_OFFER)?,
            log_exchange_events: flag(CONFIG_LOG_EXCHANGE_EVENTS)?,
        })
    }
}
