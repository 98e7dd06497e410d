//! Multi-view edit pipeline.
//!
//! Three strictly sequential stages — vision analysis, prompt enhancement,
//! per-slot synthesis — with the synthesis stage fanned out across slots.
//! Synthesis or upload failure on any slot fails the whole operation
//! before anything is committed; persistence failures after that point
//! are tolerated per slot.

use std::collections::BTreeMap;
use std::sync::Arc;

use futures_util::future::join_all;
use tracing::{info_span, Instrument};
use uuid::Uuid;

use crate::ai::completion::truncate;
use crate::ai::{CompletionClient, CompletionOptions, ImageClient, ImageOptions};
use crate::revision::{CommitRevision, RevisionStore, SnapshotPatch};
use crate::storage::{thumbnail, ObjectStore};

use super::error::GeneratorError;
use super::prompt;

/// Characters of analysis/enhancement text kept in revision metadata.
const SNIPPET_LEN: usize = 160;

/// One multi-view edit request.
#[derive(Debug, Clone)]
pub struct MultiViewEditRequest {
    pub entity_id: String,
    pub owner_id: String,
    /// Slot name (front/back/side) to the prior artifact URL.
    pub views: BTreeMap<String, String>,
    pub instruction: String,
    pub display_name: Option<String>,
    pub category: Option<String>,
}

/// Per-slot persistence outcome.
#[derive(Debug, Clone)]
pub enum SlotOutcome {
    Committed {
        slot: String,
        revision_id: String,
        revision_number: i64,
        artifact_url: String,
    },
    Failed {
        slot: String,
        error: String,
    },
}

/// Result of a completed edit operation.
#[derive(Debug, Clone)]
pub struct MultiViewEditOutcome {
    pub batch_id: String,
    pub refined_instruction: String,
    /// Slot name to the new artifact URL, committed slots only.
    pub views: BTreeMap<String, String>,
    pub revision_ids: Vec<String>,
    pub slots: Vec<SlotOutcome>,
}

impl MultiViewEditOutcome {
    /// True when every slot's revision write landed.
    pub fn fully_committed(&self) -> bool {
        self.slots
            .iter()
            .all(|s| matches!(s, SlotOutcome::Committed { .. }))
    }
}

/// Model and sampling configuration for the editor.
#[derive(Debug, Clone)]
pub struct EditorOptions {
    pub vision_model: String,
    pub text_model: String,
    pub analysis_max_tokens: u32,
    pub enhancement_max_tokens: u32,
    /// Low temperature: consistency over creativity for both text stages.
    pub temperature: f32,
    pub image: ImageOptions,
}

impl Default for EditorOptions {
    fn default() -> Self {
        Self {
            vision_model: "gpt-4o".to_string(),
            text_model: "gpt-4o-mini".to_string(),
            analysis_max_tokens: 400,
            enhancement_max_tokens: 300,
            temperature: 0.2,
            image: ImageOptions::default(),
        }
    }
}

struct SlotArtifact {
    slot: String,
    artifact_url: String,
    thumbnail_url: Option<String>,
    provider_url: String,
}

/// Orchestrates the edit pipeline against the provider seams.
pub struct MultiViewEditor {
    completion: Arc<dyn CompletionClient>,
    images: Arc<dyn ImageClient>,
    objects: Arc<dyn ObjectStore>,
    store: RevisionStore,
    options: EditorOptions,
}

impl MultiViewEditor {
    pub fn new(
        completion: Arc<dyn CompletionClient>,
        images: Arc<dyn ImageClient>,
        objects: Arc<dyn ObjectStore>,
        store: RevisionStore,
        options: EditorOptions,
    ) -> Self {
        Self {
            completion,
            images,
            objects,
            store,
            options,
        }
    }

    /// Runs the full edit operation and commits the results.
    pub async fn edit(
        &self,
        request: MultiViewEditRequest,
    ) -> Result<MultiViewEditOutcome, GeneratorError> {
        if request.views.is_empty() {
            return Err(GeneratorError::NoViews);
        }

        let batch_id = Uuid::new_v4().to_string();
        let span = info_span!("multiview_edit",
            entity_id = %request.entity_id,
            batch_id = %batch_id,
            slots = request.views.len(),
        );

        async {
            // Stage 1: vision analysis over all prior views.
            let analysis = self
                .completion
                .complete(
                    &prompt::analysis_messages(&request.views, &request.instruction),
                    &CompletionOptions {
                        model: self.options.vision_model.clone(),
                        max_tokens: self.options.analysis_max_tokens,
                        temperature: self.options.temperature,
                        seed: None,
                        json_response: false,
                    },
                )
                .instrument(info_span!("analysis"))
                .await
                .map_err(GeneratorError::Analysis)?;

            // Stage 2: refine the instruction with the analysis in hand.
            let refined = self
                .completion
                .complete(
                    &prompt::enhancement_messages(&analysis, &request.instruction),
                    &CompletionOptions {
                        model: self.options.text_model.clone(),
                        max_tokens: self.options.enhancement_max_tokens,
                        temperature: self.options.temperature,
                        seed: None,
                        json_response: false,
                    },
                )
                .instrument(info_span!("enhancement"))
                .await
                .map_err(GeneratorError::Enhancement)?;

            // Stage 3: synthesize, thumbnail, and upload every slot in parallel.
            let artifacts = self
                .synthesize_all(&request, &refined, &batch_id)
                .instrument(info_span!("synthesis"))
                .await?;

            // Stage 4: sequential per-slot commits, partial-failure tolerant.
            let outcome = self.commit_all(&request, &analysis, &refined, batch_id, artifacts);
            Ok(outcome)
        }
        .instrument(span)
        .await
    }

    async fn synthesize_all(
        &self,
        request: &MultiViewEditRequest,
        refined: &str,
        batch_id: &str,
    ) -> Result<Vec<SlotArtifact>, GeneratorError> {
        let futures = request.views.iter().map(|(slot, prior_url)| {
            let slot = slot.clone();
            let prior_url = prior_url.clone();
            let prompt_text = prompt::synthesis_prompt(refined, &slot);
            let images = Arc::clone(&self.images);
            let objects = Arc::clone(&self.objects);
            let image_opts = self.options.image.clone();
            let entity_id = request.entity_id.clone();
            let batch_id = batch_id.to_string();

            async move {
                let image = images
                    .generate(&prompt_text, &prior_url, &image_opts)
                    .await
                    .map_err(|e| GeneratorError::Synthesis {
                        slot: slot.clone(),
                        source: e,
                    })?;

                let artifact_path = format!("edits/{}/{}/{}.png", entity_id, batch_id, slot);
                let artifact_url = objects
                    .upload(&image.data, &artifact_path)
                    .await
                    .map_err(|e| GeneratorError::Upload {
                        slot: slot.clone(),
                        source: e,
                    })?;

                // The preview is a derived convenience; its loss never
                // fails the slot.
                let thumbnail_url = match thumbnail::derive(&image.data, thumbnail::DEFAULT_MAX_DIM)
                {
                    Ok(bytes) => {
                        let thumb_path =
                            format!("edits/{}/{}/{}_thumb.png", entity_id, batch_id, slot);
                        match objects.upload(&bytes, &thumb_path).await {
                            Ok(url) => Some(url),
                            Err(e) => {
                                log::warn!("Thumbnail upload failed for slot {}: {}", slot, e);
                                None
                            }
                        }
                    }
                    Err(e) => {
                        log::warn!("Thumbnail derivation failed for slot {}: {}", slot, e);
                        None
                    }
                };

                Ok(SlotArtifact {
                    slot,
                    artifact_url,
                    thumbnail_url,
                    provider_url: image.url,
                })
            }
        });

        let results: Vec<Result<SlotArtifact, GeneratorError>> = join_all(futures).await;

        let mut artifacts = Vec::with_capacity(results.len());
        for result in results {
            artifacts.push(result?);
        }
        Ok(artifacts)
    }

    fn commit_all(
        &self,
        request: &MultiViewEditRequest,
        analysis: &str,
        refined: &str,
        batch_id: String,
        artifacts: Vec<SlotArtifact>,
    ) -> MultiViewEditOutcome {
        let metadata = serde_json::json!({
            "vision_model": self.options.vision_model,
            "text_model": self.options.text_model,
            "analysis_snippet": truncate(analysis, SNIPPET_LEN),
            "refined_snippet": truncate(refined, SNIPPET_LEN),
        });

        let mut views = BTreeMap::new();
        let mut revision_ids = Vec::new();
        let mut slots = Vec::new();

        for artifact in artifacts {
            let input = CommitRevision {
                entity_id: request.entity_id.clone(),
                slot: artifact.slot.clone(),
                artifact_url: artifact.artifact_url.clone(),
                thumbnail_url: artifact.thumbnail_url.clone(),
                prompt: Some(request.instruction.clone()),
                batch_id: Some(batch_id.clone()),
                edit_type: Some("multi_view_edit".to_string()),
                owner_id: Some(request.owner_id.clone()),
                metadata: metadata.clone(),
                snapshot: Some(SnapshotPatch {
                    name: request.display_name.clone(),
                    category: request.category.clone(),
                }),
                created_at: None,
            };

            match self.store.commit(input) {
                Ok(committed) => {
                    log::debug!(
                        "Committed revision {} (#{}) for slot {} (provider url {})",
                        committed.id,
                        committed.revision_number,
                        artifact.slot,
                        artifact.provider_url,
                    );
                    views.insert(artifact.slot.clone(), artifact.artifact_url.clone());
                    revision_ids.push(committed.id.clone());
                    slots.push(SlotOutcome::Committed {
                        slot: artifact.slot,
                        revision_id: committed.id,
                        revision_number: committed.revision_number,
                        artifact_url: artifact.artifact_url,
                    });
                }
                Err(e) => {
                    log::warn!(
                        "Revision write failed for slot {} of entity {}: {}",
                        artifact.slot,
                        request.entity_id,
                        e
                    );
                    slots.push(SlotOutcome::Failed {
                        slot: artifact.slot,
                        error: e.to_string(),
                    });
                }
            }
        }

        MultiViewEditOutcome {
            batch_id,
            refined_instruction: refined.to_string(),
            views,
            revision_ids,
            slots,
        }
    }
}
