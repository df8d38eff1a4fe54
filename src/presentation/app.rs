use crate::domain::drive::DrivePad;
use crate::domain::models::{
    AppEvent, ConnectionStatus, LinkCommand, MessageSeverity, Reading, StatusMessage, Tab,
};
use crate::domain::radar::RadarPlacement;
use crate::domain::settings::{Settings, SettingsService};
use crate::infrastructure::serial::{protocol::DriveCommand, LinkHandle, LinkService};
use eframe::egui;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tracing::{info, warn};

/// How long closing the window waits for the link to shut down
const LINK_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(2);

pub struct RadarApp {
    pub(crate) settings: Arc<Mutex<SettingsService>>,
    /// Edited by the settings tab, applied only on Save
    pub(crate) settings_draft: Settings,

    // Serial link
    pub(crate) link: LinkHandle,
    pub(crate) events_rx: mpsc::UnboundedReceiver<AppEvent>,

    // State
    pub(crate) connection_status: ConnectionStatus,
    pub(crate) status_message: Option<StatusMessage>,
    pub(crate) latest_reading: Option<Reading>,
    pub(crate) placement: Option<RadarPlacement>,
    pub(crate) readings_received: u64,

    // Drive controls
    pub(crate) drive_pad: DrivePad,
    pub(crate) last_sent: Option<DriveCommand>,

    // UI State
    pub(crate) selected_tab: Tab,
    pub(crate) is_dark_mode: bool,
}

impl RadarApp {
    pub fn new(cc: &eframe::CreationContext<'_>, settings: Arc<Mutex<SettingsService>>) -> Self {
        let settings_draft = match settings.lock() {
            Ok(s) => s.get().clone(),
            Err(_) => Settings::default(),
        };
        let is_dark_mode = settings_draft.dark_mode;
        let long_press = settings_draft.long_press_ms;
        crate::presentation::theme::configure_radar_style(&cc.egui_ctx, is_dark_mode);

        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let link = LinkService::spawn(events_tx, settings.clone());

        // Connect straight away, the screen is useless without the device
        link.send(LinkCommand::Connect);

        Self {
            settings,
            settings_draft,
            link,
            events_rx,
            connection_status: ConnectionStatus::Connecting,
            status_message: None,
            latest_reading: None,
            placement: None,
            readings_received: 0,
            drive_pad: DrivePad::new(Duration::from_millis(long_press)),
            last_sent: None,
            selected_tab: Tab::Radar,
            is_dark_mode,
        }
    }

    pub(crate) fn connect(&mut self) {
        self.connection_status = ConnectionStatus::Connecting;
        self.link.send(LinkCommand::Connect);
    }

    pub(crate) fn disconnect(&mut self) {
        self.link.send(LinkCommand::Disconnect);
    }

    fn radar_baseline(&self) -> f32 {
        self.settings
            .lock()
            .map(|s| s.get().radar_baseline)
            .unwrap_or(350.0)
    }

    fn process_reading(&mut self, reading: Reading) {
        self.placement = Some(RadarPlacement::from_reading(&reading, self.radar_baseline()));
        self.latest_reading = Some(reading);
        self.readings_received += 1;
    }

    fn process_events(&mut self) {
        while let Ok(event) = self.events_rx.try_recv() {
            match event {
                AppEvent::Reading(reading) => self.process_reading(reading),
                AppEvent::ConnectionStatus(status) => {
                    self.connection_status = status;
                    if status != ConnectionStatus::Connected {
                        self.drive_pad = DrivePad::new(self.long_press());
                    }
                }
                AppEvent::LogMessage(msg) => {
                    if msg.severity == MessageSeverity::Error {
                        warn!("{}", msg.message);
                    }
                    self.status_message = Some(msg);
                }
            }
        }
    }

    fn long_press(&self) -> Duration {
        let ms = self
            .settings
            .lock()
            .map(|s| s.get().long_press_ms)
            .unwrap_or(500);
        Duration::from_millis(ms)
    }

    fn drive(&mut self, pressed: Option<DriveCommand>) {
        if let Some(command) = self.drive_pad.update(pressed, Instant::now()) {
            info!("Drive command {}", command);
            self.last_sent = Some(command);
            self.link.send(LinkCommand::Send(command));
        }
    }

    pub(crate) fn set_dark_mode(&mut self, ctx: &egui::Context, is_dark: bool) {
        self.is_dark_mode = is_dark;
        crate::presentation::theme::configure_radar_style(ctx, is_dark);
        self.settings_draft.dark_mode = is_dark;
        if let Ok(mut settings) = self.settings.lock() {
            if let Err(e) = settings.set_dark_mode(is_dark) {
                warn!("Failed to save settings: {}", e);
            }
        }
    }

    /// Validate and persist the draft, then refresh state derived from it
    pub(crate) fn save_settings(&mut self) -> anyhow::Result<()> {
        self.settings
            .lock()
            .map_err(|_| anyhow::anyhow!("Lock error"))?
            .apply(self.settings_draft.clone())?;
        self.apply_settings();
        Ok(())
    }

    fn apply_settings(&mut self) {
        let long_press = self.long_press();
        self.drive_pad.set_long_press(long_press);
        let baseline = self.radar_baseline();
        if let Some(reading) = self.latest_reading {
            self.placement = Some(RadarPlacement::from_reading(&reading, baseline));
        }
    }
}

impl eframe::App for RadarApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_events();

        // The sweep animates continuously
        ctx.request_repaint();

        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.selectable_value(&mut self.selected_tab, Tab::Radar, "Radar");
                ui.selectable_value(&mut self.selected_tab, Tab::Settings, "Settings");

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let switch_icon = if self.is_dark_mode {
                        "☀ Light"
                    } else {
                        "🌙 Dark"
                    };
                    if ui.button(switch_icon).clicked() {
                        let is_dark = !self.is_dark_mode;
                        self.set_dark_mode(ctx, is_dark);
                    }
                });
            });
        });

        let mut pressed = None;
        egui::CentralPanel::default().show(ctx, |ui| {
            use crate::presentation::tabs;
            match self.selected_tab {
                Tab::Radar => pressed = tabs::radar::render(self, ui),
                Tab::Settings => tabs::settings::render(self, ui),
            }
        });

        self.drive(pressed);
    }
}

impl Drop for RadarApp {
    fn drop(&mut self) {
        if self.drive_pad.held().is_some() {
            self.link.send(LinkCommand::Send(DriveCommand::Stop));
        }
        self.link.send(LinkCommand::Disconnect);
        self.link.shutdown(LINK_SHUTDOWN_TIMEOUT);
    }
}
