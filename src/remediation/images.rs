//! Image tagging pass.
//!
//! Every Image content object ends this pass in one of three states: described
//! by a `/Figure`, marked as an `/Artifact`, or left for the retype pass because
//! some other node already claims it. Images of nodes the retype pass turns into
//! `/Figure` are picked up again by [`describe_retyped_figures`].

use super::classifier::{AltTextProvider, AltTextSource, ContentClassifier};
use super::detector::{TagAssessment, TagDetector, TagQuality};
use super::stats::{ReviewCode, ReviewItem, RunLog};
use crate::config::DecorativeThresholds;
use crate::document::{ContentKind, ContentObject, DocumentModel};
use crate::error::Result;
use crate::structure::{ContentIndex, NodeId, StructRole, StructureNode};

/// Tag, describe or mark every image in the document.
pub fn tag_images<D: DocumentModel + ?Sized>(
    doc: &mut D,
    thresholds: &DecorativeThresholds,
    detector: &TagDetector,
    provider: &dyn AltTextProvider,
    log: &mut RunLog,
) -> Result<()> {
    let classifier = ContentClassifier::new(thresholds, detector, provider);
    let images: Vec<ContentObject> = doc
        .pages()
        .iter()
        .flat_map(|p| p.content_objects.iter())
        .filter(|o| o.kind == ContentKind::Image)
        .cloned()
        .collect();

    let heuristic_before = log.stats.heuristic_alt_texts;

    for image in &images {
        let content = image.content_ref();
        // Rebuilt per image: earlier iterations insert nodes
        let index = ContentIndex::build(doc.tree());
        let assessment = detector.assess_image(doc.tree(), &index, &content);

        match assessment.quality {
            TagQuality::Good => {
                log.stats.skipped_already_tagged += 1;
            },
            TagQuality::Poor => {
                improve_figure(doc, &classifier, image, assessment, log)?;
            },
            TagQuality::Absent => {
                let owners = index.owners(&content);
                if owners.iter().any(|id| {
                    doc.tree()
                        .get(*id)
                        .is_some_and(|n| n.role.is_artifact())
                }) {
                    log.stats.skipped_already_tagged += 1;
                    continue;
                }
                if !owners.is_empty() {
                    // Claimed by a node of another role; the retype pass decides
                    continue;
                }

                let classification = classifier.classify(image, None);
                let container = doc.page_container(image.page_index);
                if classification.is_decorative {
                    let node = StructureNode::new(StructRole::Artifact)
                        .with_alt_text("")
                        .with_page(image.page_index)
                        .with_content(content);
                    doc.tree_mut().append_child(container, node)?;
                    log.stats.decorative_images += 1;
                    log::debug!("Marked decorative image {} as artifact", content);
                } else {
                    let node = StructureNode::new(StructRole::Figure)
                        .with_title(format!("Image on page {}", image.page_index + 1))
                        .with_alt_text(classification.alt_text.text.clone())
                        .with_page(image.page_index)
                        .with_content(content);
                    doc.tree_mut().append_child(container, node)?;
                    log.stats.images_tagged += 1;
                    count_source(log, classification.alt_text.source);
                    log::debug!("Tagged image {} as figure", content);
                }
            },
        }
    }

    let heuristic = log.stats.heuristic_alt_texts - heuristic_before;
    note_heuristic_descriptions(log, heuristic);
    Ok(())
}

/// Describe the images of nodes the retype pass just turned into `/Figure`.
///
/// Such images were skipped by [`tag_images`] because another role owned them.
/// Adequate figures are not counted as skipped a second time.
pub fn describe_retyped_figures<D: DocumentModel + ?Sized>(
    doc: &mut D,
    retyped: &[NodeId],
    thresholds: &DecorativeThresholds,
    detector: &TagDetector,
    provider: &dyn AltTextProvider,
    log: &mut RunLog,
) -> Result<()> {
    let classifier = ContentClassifier::new(thresholds, detector, provider);
    let heuristic_before = log.stats.heuristic_alt_texts;

    let mut images: Vec<ContentObject> = Vec::new();
    for id in retyped {
        let Some(node) = doc.tree().get(*id) else {
            continue;
        };
        if node.role != StructRole::Figure {
            continue;
        }
        for content in node.associated_content() {
            if let Some(object) = doc.content_object(content) {
                if object.kind == ContentKind::Image && !images.iter().any(|i| i.content_ref() == *content) {
                    images.push(object.clone());
                }
            }
        }
    }

    // Only alternate text changes below, so one index serves every image
    let index = ContentIndex::build(doc.tree());
    for image in &images {
        let assessment = detector.assess_image(doc.tree(), &index, &image.content_ref());
        if assessment.quality == TagQuality::Poor {
            improve_figure(doc, &classifier, image, assessment, log)?;
        }
    }

    let heuristic = log.stats.heuristic_alt_texts - heuristic_before;
    note_heuristic_descriptions(log, heuristic);
    Ok(())
}

/// Replace weak alternate text on the figure describing `image`, or flag the
/// figure when the image looks decorative.
fn improve_figure<D: DocumentModel + ?Sized>(
    doc: &mut D,
    classifier: &ContentClassifier<'_>,
    image: &ContentObject,
    assessment: TagAssessment,
    log: &mut RunLog,
) -> Result<()> {
    let Some(figure) = assessment.node else {
        return Ok(());
    };
    let content = image.content_ref();
    let classification = classifier.classify(image, assessment.existing_text.as_deref());
    if classification.is_decorative {
        log.unresolved(
            ReviewItem::new(
                ReviewCode::AmbiguousFigure,
                format!(
                    "Figure has weak alternate text {:?} but the image looks decorative",
                    assessment.existing_text.unwrap_or_default()
                ),
            )
            .with_location(content.to_string()),
        );
        return Ok(());
    }

    log::debug!("Replacing weak alternate text {:?} on {}", assessment.existing_text, content);
    doc.tree_mut().node_mut(figure)?.alternate_text = Some(classification.alt_text.text);
    log.stats.alt_texts_improved += 1;
    count_source(log, classification.alt_text.source);
    Ok(())
}

fn note_heuristic_descriptions(log: &mut RunLog, count: usize) {
    if count > 0 {
        log.advise(ReviewItem::new(
            ReviewCode::HeuristicDescription,
            format!(
                "{} image description(s) were generated from geometry alone; manual or AI review is advisable",
                count
            ),
        ));
    }
}

fn count_source(log: &mut RunLog, source: AltTextSource) {
    match source {
        AltTextSource::Provider => log.stats.provider_alt_texts += 1,
        AltTextSource::Heuristic => log.stats.heuristic_alt_texts += 1,
        AltTextSource::None => {},
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AltTextPolicy;
    use crate::document::{PageRecord, TaggedDocument};
    use crate::remediation::classifier::{DescriptionRequest, HeuristicProvider};
    use crate::structure::ContentRef;

    struct CaptionProvider;

    impl AltTextProvider for CaptionProvider {
        fn describe(&self, request: &DescriptionRequest<'_>) -> Result<Option<String>> {
            Ok(Some(format!("Product photograph from page {}", request.page_index + 1)))
        }
    }

    fn run(doc: &mut TaggedDocument) -> RunLog {
        let mut log = RunLog::new();
        tag_images(
            doc,
            &DecorativeThresholds::default(),
            &TagDetector::new(AltTextPolicy::default()),
            &HeuristicProvider,
            &mut log,
        )
        .unwrap();
        log
    }

    #[test]
    fn test_untagged_images() {
        let mut doc = TaggedDocument::new();
        doc.add_page(
            PageRecord::new()
                .with_object(ContentObject::image(0, 0, 800, 600))
                .with_object(ContentObject::image(0, 1, 10, 10)),
        );

        let log = run(&mut doc);
        assert_eq!(log.stats.images_tagged, 1);
        assert_eq!(log.stats.decorative_images, 1);
        assert_eq!(log.stats.heuristic_alt_texts, 1);
        assert_eq!(log.stats.unresolved, 0);
        assert_eq!(log.review_items.len(), 1);

        let index = ContentIndex::build(&doc.tree);
        let figure = index.owners(&ContentRef::new(0, 0))[0];
        let node = doc.tree.node(figure).unwrap();
        assert_eq!(node.role, StructRole::Figure);
        assert_eq!(node.title.as_deref(), Some("Image on page 1"));
        assert_eq!(node.alternate_text.as_deref(), Some("Figure or photograph on page 1"));

        let artifact = index.owners(&ContentRef::new(0, 1))[0];
        let node = doc.tree.node(artifact).unwrap();
        assert_eq!(node.role, StructRole::Artifact);
        assert_eq!(node.alternate_text.as_deref(), Some(""));

        // Second run finds nothing to do
        let log = run(&mut doc);
        assert_eq!(log.stats.structural_changes(), 0);
        assert_eq!(log.stats.skipped_already_tagged, 2);
    }

    #[test]
    fn test_weak_alt_text_is_improved() {
        let mut doc = TaggedDocument::new();
        doc.add_page(PageRecord::new().with_object(ContentObject::image(0, 3, 900, 300)));
        let root = doc.tree.root();
        let figure = doc
            .tree
            .append_child(
                root,
                StructureNode::new(StructRole::Figure)
                    .with_alt_text("image")
                    .with_content(ContentRef::new(0, 3)),
            )
            .unwrap();

        let log = run(&mut doc);
        assert_eq!(log.stats.alt_texts_improved, 1);
        assert_eq!(log.stats.images_tagged, 0);
        assert_eq!(
            doc.tree.node(figure).unwrap().alternate_text.as_deref(),
            Some("Diagram or illustration on page 1")
        );
    }

    #[test]
    fn test_weak_alt_text_on_decorative_image_is_unresolved() {
        let mut doc = TaggedDocument::new();
        doc.add_page(PageRecord::new().with_object(ContentObject::image(0, 0, 1800, 1200)));
        let root = doc.tree.root();
        let figure = doc
            .tree
            .append_child(
                root,
                StructureNode::new(StructRole::Figure)
                    .with_alt_text("bg.png")
                    .with_content(ContentRef::new(0, 0)),
            )
            .unwrap();

        let log = run(&mut doc);
        assert_eq!(log.stats.unresolved, 1);
        assert_eq!(log.review_items[0].code, ReviewCode::AmbiguousFigure);
        assert_eq!(doc.tree.node(figure).unwrap().alternate_text.as_deref(), Some("bg.png"));
    }

    #[test]
    fn test_image_claimed_by_other_role_is_left_for_retype() {
        let mut doc = TaggedDocument::new();
        doc.add_page(PageRecord::new().with_object(ContentObject::image(0, 0, 640, 480)));
        let root = doc.tree.root();
        doc.tree
            .append_child(
                root,
                StructureNode::new(StructRole::Table)
                    .with_title("Image on page 1")
                    .with_content(ContentRef::new(0, 0)),
            )
            .unwrap();

        let log = run(&mut doc);
        assert_eq!(log.stats.structural_changes(), 0);
        assert_eq!(doc.tree.len(), 2);
    }

    #[test]
    fn test_retyped_figure_without_alt_text_is_described() {
        let mut doc = TaggedDocument::new();
        doc.add_page(
            PageRecord::new()
                .with_object(ContentObject::image(0, 0, 640, 480))
                .with_object(ContentObject::image(0, 1, 900, 300)),
        );
        let root = doc.tree.root();
        let figure = doc
            .tree
            .append_child(
                root,
                StructureNode::new(StructRole::Figure)
                    .with_title("Image on page 1")
                    .with_content(ContentRef::new(0, 0)),
            )
            .unwrap();
        let described = doc
            .tree
            .append_child(
                root,
                StructureNode::new(StructRole::Figure)
                    .with_alt_text("Revenue by quarter, 2019 to 2023")
                    .with_content(ContentRef::new(0, 1)),
            )
            .unwrap();

        let mut log = RunLog::new();
        describe_retyped_figures(
            &mut doc,
            &[figure, described],
            &DecorativeThresholds::default(),
            &TagDetector::default(),
            &HeuristicProvider,
            &mut log,
        )
        .unwrap();

        assert_eq!(log.stats.alt_texts_improved, 1);
        assert_eq!(log.stats.heuristic_alt_texts, 1);
        // Adequate figures are not counted again
        assert_eq!(log.stats.skipped_already_tagged, 0);
        assert_eq!(
            doc.tree.node(figure).unwrap().alternate_text.as_deref(),
            Some("Figure or photograph on page 1")
        );
        assert_eq!(
            doc.tree.node(described).unwrap().alternate_text.as_deref(),
            Some("Revenue by quarter, 2019 to 2023")
        );

        // Nothing left for the regular pass
        let log = run(&mut doc);
        assert_eq!(log.stats.structural_changes(), 0);
        assert_eq!(log.stats.skipped_already_tagged, 2);
    }

    #[test]
    fn test_provider_descriptions_are_counted_separately() {
        let mut doc = TaggedDocument::new();
        doc.add_page(PageRecord::new().with_object(ContentObject::image(0, 0, 640, 480)));
        let mut log = RunLog::new();
        tag_images(
            &mut doc,
            &DecorativeThresholds::default(),
            &TagDetector::default(),
            &CaptionProvider,
            &mut log,
        )
        .unwrap();
        assert_eq!(log.stats.provider_alt_texts, 1);
        assert_eq!(log.stats.heuristic_alt_texts, 0);
        assert!(log.review_items.is_empty());
    }
}
