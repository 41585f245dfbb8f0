//! Template handler.

use super::{HandlerOutcome, MigrationHandler, MigrationScope};
use crate::error::MigrationError;
use crate::model::{EntityType, LegacyExport, MigratedEntity, MigratedTemplate};
use tracing::{debug, warn};

#[derive(Debug, Default)]
pub struct TemplateHandler;

impl MigrationHandler for TemplateHandler {
    fn entity_type(&self) -> EntityType {
        EntityType::Template
    }

    fn prepare(&self, export: &LegacyExport, scope: &MigrationScope<'_>) -> Result<(), MigrationError> {
        for template in &export.templates {
            scope.check_cancelled()?;
            scope.context.add_template_key(&template.alias, template.key);
        }
        Ok(())
    }

    fn migrate(
        &self,
        export: &LegacyExport,
        scope: &MigrationScope<'_>,
    ) -> Result<HandlerOutcome, MigrationError> {
        let context = scope.context;
        let mut outcome = HandlerOutcome::default();

        for template in &export.templates {
            scope.check_cancelled()?;
            if context.is_blocked(EntityType::Template.name(), &template.alias) {
                debug!(template = %template.alias, "Skipping blocked template");
                scope.report.record_blocked();
                outcome.skip();
                continue;
            }

            let master_key = match template.master_alias.as_deref().map(str::trim) {
                Some(master) if !master.is_empty() => {
                    let key = context.get_template_key(master);
                    if key.is_nil() {
                        warn!(template = %template.alias, master = %master, "Master template not found");
                        scope.report.warn(format!(
                            "template '{}' has unknown master '{master}'",
                            template.alias
                        ));
                        None
                    } else {
                        Some(key)
                    }
                }
                _ => None,
            };

            outcome.push(MigratedEntity::Template(MigratedTemplate {
                key: template.key,
                alias: template.alias.clone(),
                master_key,
            }));
        }

        Ok(outcome)
    }
}
