use async_trait::async_trait;
use chainrelay_core::{
    ActionError, DeliveryHints, Notification, NotificationPayload, TransactionEvent,
};
use chainrelay_evm::{extract_event, Contract};
use tracing::warn;

use super::{schema, sender};
use crate::action::Action;
use crate::events::VaultEvent;
use crate::services::Services;
use crate::templates::discord;

/// Activity of the xGGP vault. No enrichment.
pub struct VaultAction;

#[async_trait]
impl Action for VaultAction {
    type Event = VaultEvent;
    type Enrichment = ();

    fn name(&self) -> &'static str {
        "vault"
    }

    fn extract(
        &self,
        _services: &Services,
        tx: &TransactionEvent,
    ) -> Result<Option<VaultEvent>, ActionError> {
        for name in VaultEvent::NAMES {
            let Some(log) = extract_event(tx, &schema(Contract::GgpVault, name)?) else {
                continue;
            };
            match VaultEvent::from_named_log(&log) {
                Ok(event) => return Ok(Some(event)),
                Err(e) => warn!(event = name, error = %e, "vault log has unexpected shape"),
            }
        }
        Err(ActionError::EventNotFound {
            event: VaultEvent::NAMES.join(" | "),
        })
    }

    async fn enrich(&self, _services: &Services, _event: &VaultEvent) -> Result<(), ActionError> {
        Ok(())
    }

    fn compose(
        &self,
        services: &Services,
        tx: &TransactionEvent,
        event: &VaultEvent,
        _: (),
    ) -> Result<Vec<Notification>, ActionError> {
        let message = discord::vault(tx.network, &tx.hash, &sender(tx)?, event);
        Ok(vec![Notification::new(
            NotificationPayload::new().with_chat(message),
            DeliveryHints::new(services.network()),
        )])
    }
}
