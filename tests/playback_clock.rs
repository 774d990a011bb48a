use std::sync::Arc;
use std::time::Duration;

use image::RgbImage;
use tokio::sync::mpsc;

use reel_composer::cancel::CancelToken;
use reel_composer::playback::{PlaybackClock, PlaybackState, PreviewPlayer};
use reel_composer::render::SoftwareSurface;
use reel_composer::timeline::{PixelSource, Slide, Timeline};

fn timeline(count: usize, duration_ms: u64) -> Timeline {
    let pixels = Arc::new(RgbImage::new(4, 4));
    let slides = (0..count)
        .map(|i| Slide::new(PixelSource::Decoded(Arc::clone(&pixels))).with_id(format!("s{}", i)))
        .collect();
    Timeline::from_slides(slides, duration_ms).with_transition("fade")
}

#[test]
fn test_thirty_ticks_wrap_to_first_slide() {
    let mut clock = PlaybackClock::new(&timeline(3, 1000), 100);
    clock.start();

    let mut indices = Vec::new();
    for _ in 0..30 {
        clock.tick();
        indices.push(clock.state().current_slide_index);
    }

    assert_eq!(indices[8], 0);
    assert_eq!(indices[9], 1);
    assert_eq!(indices[28], 2);
    assert_eq!(clock.state().current_slide_index, 0);
    assert_eq!(clock.state().progress_percent, 0.0);
}

#[tokio::test(start_paused = true)]
async fn test_player_follows_virtual_clock() {
    let mut player = PreviewPlayer::load(&timeline(3, 1000), SoftwareSurface::new(4, 4), 100)
        .await
        .unwrap();

    let (tx, mut rx) = mpsc::unbounded_channel::<PlaybackState>();
    let cancel = CancelToken::new();
    let stop = cancel.clone();

    let handle = tokio::spawn(async move {
        player
            .run(&cancel, move |state, _| {
                let _ = tx.send(state.clone());
            })
            .await
    });

    tokio::time::sleep(Duration::from_millis(3050)).await;
    stop.cancel();
    let ticks = handle.await.unwrap();

    let mut states = Vec::new();
    while let Some(state) = rx.recv().await {
        states.push(state);
    }

    assert_eq!(ticks, 30);
    assert_eq!(states.len(), 31);
    assert!(states[0].is_playing);
    assert_eq!(states[0].progress_percent, 0.0);
    assert_eq!(states[5].progress_percent, 50.0);

    let last = states.last().unwrap();
    assert_eq!(last.current_slide_index, 0);
    assert_eq!(last.progress_percent, 0.0);
}

#[tokio::test(start_paused = true)]
async fn test_cancel_stops_further_ticks() {
    let mut player = PreviewPlayer::load(&timeline(2, 1000), SoftwareSurface::new(4, 4), 100)
        .await
        .unwrap();
    let cancel = CancelToken::new();
    cancel.cancel();

    let mut frames = 0;
    let ticks = player.run(&cancel, |_, _| frames += 1).await;

    // Only the initial frame is drawn
    assert_eq!(ticks, 0);
    assert_eq!(frames, 1);
    assert!(!player.state().is_playing);
}
