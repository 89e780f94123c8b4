//! Interactive link preview screen.

use std::io::stdout;
use std::sync::Arc;

use crossterm::event::{DisableMouseCapture, EnableMouseCapture, EventStream};
use crossterm::execute;
use futures_util::StreamExt;
use ratatui::{
    DefaultTerminal, Frame,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph},
};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::application::services::{LinkPreview, PreviewLayout, SizeResolution};
use crate::application::use_cases::{LinkPreviewUseCase, ProbeOutcome};
use crate::domain::entities::ImageMetadataCache;
use crate::domain::ports::UiHostPort;
use crate::presentation::events::{InputAction, input_action};
use crate::presentation::theme::{StyleSheetCache, Theme};
use crate::presentation::widgets::{CardHit, LinkPreviewCard};

/// Preview of a single link with its card, opened from the command line.
pub struct PreviewScreen {
    preview: LinkPreview,
    images_metadata: ImageMetadataCache,
    use_case: LinkPreviewUseCase,
    host: Arc<dyn UiHostPort>,
    theme: Theme,
    styles: StyleSheetCache,
    token: CancellationToken,
    probe_tx: mpsc::UnboundedSender<ProbeOutcome>,
    probe_rx: mpsc::UnboundedReceiver<ProbeOutcome>,
    status: Option<String>,
    card_area: Rect,
    exiting: bool,
}

impl PreviewScreen {
    /// Creates the screen for `link`.
    #[must_use]
    pub fn new(
        link: impl Into<String>,
        layout: PreviewLayout,
        theme: Theme,
        use_case: LinkPreviewUseCase,
        host: Arc<dyn UiHostPort>,
    ) -> Self {
        let images_metadata = ImageMetadataCache::new();
        let (probe_tx, probe_rx) = mpsc::unbounded_channel();

        Self {
            preview: LinkPreview::new(link, None, layout, &images_metadata),
            images_metadata,
            use_case,
            host,
            theme,
            styles: StyleSheetCache::default(),
            token: CancellationToken::new(),
            probe_tx,
            probe_rx,
            status: None,
            card_area: Rect::default(),
            exiting: false,
        }
    }

    /// Current preview state.
    #[must_use]
    pub const fn preview(&self) -> &LinkPreview {
        &self.preview
    }

    /// Last status message.
    #[must_use]
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// Returns true once the user asked to leave.
    #[must_use]
    pub const fn is_exiting(&self) -> bool {
        self.exiting
    }

    /// Fetches metadata and starts measuring the image if needed.
    pub async fn load(&mut self) {
        let known = self.preview.open_graph().cloned();
        match self
            .use_case
            .fetch_metadata(self.preview.link(), known.as_ref())
            .await
        {
            Ok(Some(og)) => {
                self.preview.set_open_graph(Some(og), &self.images_metadata);
            }
            Ok(None) => {}
            Err(e) => {
                warn!(link = %self.preview.link(), error = %e, "No preview available");
                self.status = Some(format!("No preview available: {e}"));
                return;
            }
        }

        self.resolve_image();
    }

    fn resolve_image(&mut self) {
        match self.preview.resolve_size(&self.images_metadata) {
            SizeResolution::NeedsProbe(url) => {
                debug!(url = %url, "Measuring preview image");
                self.use_case
                    .spawn_probe(url, self.token.clone(), self.probe_tx.clone());
            }
            SizeResolution::Resolved(size) => {
                debug!(?size, "Preview image sized from metadata");
            }
            SizeResolution::NoImage => {}
        }
    }

    /// Applies a finished probe.
    pub fn apply_probe_outcome(&mut self, outcome: ProbeOutcome) {
        match outcome.result {
            Ok(dimensions) => {
                if self
                    .preview
                    .apply_probe(&outcome.url, dimensions, &self.token)
                {
                    self.status = None;
                }
            }
            Err(e) => {
                warn!(url = %outcome.url, error = %e, "Failed to measure preview image");
                self.status = Some("Image size unavailable".to_string());
            }
        }
    }

    /// Handles an input action.
    pub fn handle_action(&mut self, action: InputAction) {
        match action {
            InputAction::Quit => self.exit(),
            InputAction::OpenLink => self.open_link(),
            InputAction::PreviewImage => self.preview_image(),
            InputAction::Click { column, row } => {
                let card = LinkPreviewCard::new(&self.preview, self.styles.get(&self.theme));
                match card.hit_test(self.card_area, column, row) {
                    Some(CardHit::OpenLink) => self.open_link(),
                    Some(CardHit::PreviewImage) => self.preview_image(),
                    None => {}
                }
            }
        }
    }

    fn open_link(&mut self) {
        let link = self.preview.link().to_string();
        self.status = match self.host.open_link(&link) {
            Ok(()) => Some(format!("Opened {link}")),
            Err(e) => Some(e.to_string()),
        };
    }

    fn preview_image(&mut self) {
        let Some(file) = self.preview.preview_file() else {
            self.status = Some("Image is not ready yet".to_string());
            return;
        };

        self.status = match self.host.preview_image(&file) {
            Ok(()) => Some(format!("Viewing {}", file.caption)),
            Err(e) => Some(e.to_string()),
        };
    }

    fn exit(&mut self) {
        self.exiting = true;
        self.token.cancel();
    }

    /// Runs the screen until the user quits.
    ///
    /// # Errors
    /// Returns error if the terminal cannot be drawn to.
    pub async fn run(mut self, terminal: &mut DefaultTerminal) -> color_eyre::Result<()> {
        execute!(stdout(), EnableMouseCapture)?;
        let result = self.run_event_loop(terminal).await;
        self.exit();
        execute!(stdout(), DisableMouseCapture)?;
        info!("Preview closed");
        result
    }

    async fn run_event_loop(&mut self, terminal: &mut DefaultTerminal) -> color_eyre::Result<()> {
        let mut terminal_events = EventStream::new();

        terminal.draw(|frame| self.render(frame))?;
        self.load().await;
        terminal.draw(|frame| self.render(frame))?;

        while !self.exiting {
            tokio::select! {
                Some(outcome) = self.probe_rx.recv() => {
                    self.apply_probe_outcome(outcome);
                }

                event = terminal_events.next() => {
                    match event {
                        Some(Ok(event)) => {
                            if let Some(action) = input_action(&event) {
                                self.handle_action(action);
                            }
                        }
                        Some(Err(e)) => return Err(e.into()),
                        None => self.exit(),
                    }
                }
            }

            terminal.draw(|frame| self.render(frame))?;
        }

        Ok(())
    }

    fn render(&mut self, frame: &mut Frame) {
        let [content_area, help_area] =
            Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).areas(frame.area());

        let block = Block::bordered().title(" Link preview ");
        self.card_area = block.inner(content_area);
        frame.render_widget(block, content_area);

        let styles = self.styles.get(&self.theme);
        if self.preview.open_graph().is_some() {
            frame.render_widget(LinkPreviewCard::new(&self.preview, styles), self.card_area);
        } else {
            let text = self.status.as_deref().unwrap_or("Loading preview…");
            frame.render_widget(
                Paragraph::new(text).style(styles.site_description),
                self.card_area,
            );
        }

        let mut spans = vec![Span::styled(
            "Enter/o open link  i view image  q quit",
            Style::default().add_modifier(Modifier::DIM),
        )];
        if let Some(status) = &self.status {
            spans.push(Span::raw("  "));
            spans.push(Span::raw(status.as_str()));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), help_area);
    }
}
