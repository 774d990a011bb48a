use std::sync::Arc;

use tracing::info;

use crate::analysis::{HeuristicAnalyzer, SceneAnalysis, SceneAnalyzer};
use crate::timeline::{Slide, Timeline};
use crate::Result;

/// Applies analyzer-driven edits to slides
///
/// The analyzer is injected rather than global so each engine (and each
/// test) chooses its own.
#[derive(Clone)]
pub struct ReelEngine {
    analyzer: Arc<dyn SceneAnalyzer>,
}

impl ReelEngine {
    pub fn new(analyzer: Arc<dyn SceneAnalyzer>) -> Self {
        Self { analyzer }
    }

    pub fn analyzer(&self) -> &dyn SceneAnalyzer {
        self.analyzer.as_ref()
    }

    /// Analyze a slide and replace its filters with the suggestion
    pub async fn auto_enhance(&self, slide: &mut Slide) -> Result<SceneAnalysis> {
        let pixels = slide.source.decode().await?;
        let analysis = self.analyzer.analyze(&pixels).await?;
        let filters = self.analyzer.suggest_filters(&analysis).sanitized();

        info!(
            "Auto-enhanced slide {}: {:?} mood, style {}",
            slide.id, analysis.mood, analysis.recommended_style
        );
        slide.filters = Some(filters);
        slide.edited = true;
        Ok(analysis)
    }

    /// Auto-enhance every slide that has not been edited yet
    ///
    /// Returns how many slides were changed.
    pub async fn auto_enhance_timeline(&self, timeline: &mut Timeline) -> Result<usize> {
        let mut enhanced = 0;
        for slide in timeline.slides_mut() {
            if slide.edited {
                continue;
            }
            self.auto_enhance(slide).await?;
            enhanced += 1;
        }
        Ok(enhanced)
    }
}

impl Default for ReelEngine {
    fn default() -> Self {
        Self::new(Arc::new(HeuristicAnalyzer::new()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::Mood;
    use crate::error::NetworkError;
    use crate::filters::FilterParams;
    use crate::timeline::PixelSource;
    use async_trait::async_trait;
    use image::{Rgb, RgbImage, RgbaImage};

    /// Always reports a dark portrait
    struct FixedAnalyzer;

    #[async_trait]
    impl SceneAnalyzer for FixedAnalyzer {
        async fn analyze(&self, _image: &RgbImage) -> Result<SceneAnalysis> {
            Ok(SceneAnalysis {
                brightness: 50.0,
                contrast: 10.0,
                is_portrait: true,
                mood: Mood::Dark,
                recommended_style: "Cinematic".to_string(),
                dominant_colors: Vec::new(),
            })
        }

        async fn remove_background(&self, _image: &RgbImage) -> Result<RgbaImage> {
            Err(NetworkError::Unavailable { service: "test".to_string() }.into())
        }
    }

    fn slide(id: &str) -> Slide {
        Slide::new(PixelSource::Decoded(Arc::new(RgbImage::from_pixel(4, 4, Rgb([10, 10, 10]))))).with_id(id)
    }

    #[tokio::test]
    async fn test_auto_enhance_uses_injected_analyzer() {
        let engine = ReelEngine::new(Arc::new(FixedAnalyzer));
        let mut target = slide("a");

        let analysis = engine.auto_enhance(&mut target).await.unwrap();

        assert_eq!(analysis.recommended_style, "Cinematic");
        assert!(target.edited);
        assert_eq!(target.filters, Some(FilterParams::new(120.0, 140.0, 100.0, 0.0)));
    }

    #[tokio::test]
    async fn test_timeline_skips_edited_slides() {
        let engine = ReelEngine::default();
        let manual = FilterParams::new(60.0, 60.0, 60.0, 1.0);
        let mut timeline = Timeline::from_slides(vec![slide("a"), slide("b").with_filters(manual)], 1000);

        let changed = engine.auto_enhance_timeline(&mut timeline).await.unwrap();

        assert_eq!(changed, 1);
        assert!(timeline.slides()[0].edited);
        assert_eq!(timeline.slides()[1].filters, Some(manual));
    }
}
