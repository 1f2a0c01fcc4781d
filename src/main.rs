// src/main.rs
use iced::widget::{button, column, container, row, scrollable, text, text_input, Row, Space};
use iced::{
    alignment::Horizontal, executor, theme, window, Alignment, Application, Background, Color,
    Command, Element, Length, Settings, Theme, Vector,
};
use once_cell::sync::Lazy;
use rfd::FileDialog;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use crystal_draw::cloud_handler::CloudHandler;
use crystal_draw::csv_handler::CsvHandler;
use crystal_draw::data_types::{CrystalRecord, DataSource, DrawOutcome, RecordSource, Role};
use crystal_draw::ui::{Styles, DARK_THEME, LIGHT_THEME};
use crystal_draw::{draw, logger, AppConfig, DrawFailure, ErrorKind};

const VERSION: &str = env!("CARGO_PKG_VERSION");

// Static application state
static THEME: Lazy<Arc<Mutex<Styles>>> = Lazy::new(|| Arc::new(Mutex::new(DARK_THEME.clone())));

pub fn main() -> iced::Result {
    let _ = dotenvy::dotenv();
    logger::init();

    CrystalDraw::run(Settings {
        window: window::Settings {
            size: (900, 700),
            resizable: true,
            ..Default::default()
        },
        ..Settings::default()
    })
}

struct CrystalDraw {
    theme: Arc<Mutex<Styles>>,
    is_dark_mode: bool,
    config: AppConfig,
    data_source: Option<DataSource>,
    source: Option<Arc<dyn RecordSource>>,
    status_line: String,
    outcome: Option<DrawOutcome>,
    failure: Option<DrawFailure>,
    drawing: bool,
    cloud_dialog_open: bool,
    cloud_url_input: String,
    cloud_sheet_input: String,
}

#[derive(Debug, Clone)]
enum Message {
    ToggleTheme,
    OpenLocalFile,
    FileSelected(Option<PathBuf>),
    ShowCloudDialog,
    CloseCloudDialog,
    UpdateCloudUrl(String),
    UpdateSheetName(String),
    ConnectToCloud,
    Connected(Result<Arc<CloudHandler>, DrawFailure>),
    PerformDraw,
    DrawFinished(Result<DrawOutcome, DrawFailure>),
    Exit,
}

async fn connect(
    url: String,
    sheet: String,
    credentials: String,
) -> Result<Arc<CloudHandler>, DrawFailure> {
    CloudHandler::connect(&url, &sheet, &credentials)
        .await
        .map(Arc::new)
        .map_err(DrawFailure::from)
}

impl Application for CrystalDraw {
    type Executor = executor::Default;
    type Message = Message;
    type Theme = Theme;
    type Flags = ();

    fn new(_flags: ()) -> (Self, Command<Message>) {
        let config = AppConfig::from_env();

        // Connect once at startup when a sheet is configured; the handle is
        // reused for every draw afterwards.
        let command = match &config.sheet_url {
            Some(url) => Command::perform(
                connect(
                    url.clone(),
                    config.sheet_name.clone(),
                    config.credentials_path.clone(),
                ),
                Message::Connected,
            ),
            None => Command::none(),
        };

        let data_source = config
            .sheet_url
            .as_ref()
            .map(|url| DataSource::Cloud(url.clone(), config.sheet_name.clone()));

        let status_line = if config.sheet_url.is_some() {
            "正在連線雲端試算表...".to_string()
        } else {
            "尚未連線資料來源，請選擇雲端或本機清單。".to_string()
        };

        (
            CrystalDraw {
                theme: THEME.clone(),
                is_dark_mode: true,
                cloud_url_input: config.sheet_url.clone().unwrap_or_default(),
                cloud_sheet_input: String::new(),
                config,
                data_source,
                source: None,
                status_line,
                outcome: None,
                failure: None,
                drawing: false,
                cloud_dialog_open: false,
            },
            command,
        )
    }

    fn title(&self) -> String {
        format!("水晶靈感抽籤 v{}", VERSION)
    }

    fn update(&mut self, message: Message) -> Command<Message> {
        match message {
            Message::ToggleTheme => {
                self.is_dark_mode = !self.is_dark_mode;
                let mut theme = self.theme.lock().unwrap();
                *theme = if self.is_dark_mode {
                    DARK_THEME.clone()
                } else {
                    LIGHT_THEME.clone()
                };
                Command::none()
            }

            Message::OpenLocalFile => Command::perform(
                async {
                    FileDialog::new()
                        .add_filter("CSV Files", &["csv"])
                        .pick_file()
                },
                Message::FileSelected,
            ),

            Message::FileSelected(path_opt) => {
                if let Some(path) = path_opt {
                    tracing::info!(path = %path.display(), "local inventory selected");
                    self.data_source = Some(DataSource::Local(path.clone()));
                    self.source = Some(Arc::new(CsvHandler::new(path)));
                    self.status_line = "📁 已載入本機清單".to_string();
                    self.outcome = None;
                    self.failure = None;
                }
                Command::none()
            }

            Message::ShowCloudDialog => {
                self.cloud_dialog_open = true;
                Command::none()
            }

            Message::CloseCloudDialog => {
                self.cloud_dialog_open = false;
                Command::none()
            }

            Message::UpdateCloudUrl(url) => {
                self.cloud_url_input = url;
                Command::none()
            }

            Message::UpdateSheetName(name) => {
                self.cloud_sheet_input = name;
                Command::none()
            }

            Message::ConnectToCloud => {
                if self.cloud_url_input.is_empty() {
                    return Command::none();
                }
                let url = self.cloud_url_input.clone();
                let sheet = if self.cloud_sheet_input.is_empty() {
                    self.config.sheet_name.clone()
                } else {
                    self.cloud_sheet_input.clone()
                };
                self.data_source = Some(DataSource::Cloud(url.clone(), sheet.clone()));
                self.cloud_dialog_open = false;
                self.status_line = "正在連線雲端試算表...".to_string();

                Command::perform(
                    connect(url, sheet, self.config.credentials_path.clone()),
                    Message::Connected,
                )
            }

            Message::Connected(result) => {
                match result {
                    Ok(handler) => {
                        self.source = Some(handler);
                        self.status_line = "☁ 雲端連線成功".to_string();
                        self.failure = None;
                    }
                    Err(failure) => {
                        tracing::error!(detail = %failure.detail, "cloud connection failed");
                        self.status_line = "連線失敗".to_string();
                        self.failure = Some(failure);
                    }
                }
                Command::none()
            }

            Message::PerformDraw => {
                if let Some(source) = self.source.clone() {
                    self.drawing = true;
                    return Command::perform(
                        async move { draw::run_draw(source).await.map_err(DrawFailure::from) },
                        Message::DrawFinished,
                    );
                }
                self.failure = Some(DrawFailure {
                    kind: ErrorKind::Config,
                    detail: "尚未設定資料來源，請先連線雲端或選擇本機檔案。".to_string(),
                });
                Command::none()
            }

            Message::DrawFinished(result) => {
                self.drawing = false;
                match result {
                    Ok(outcome) => {
                        self.status_line = format!("📚 目前庫存：{} 條水晶", outcome.pool_size);
                        self.outcome = Some(outcome);
                        self.failure = None;
                    }
                    Err(failure) => {
                        tracing::error!(detail = %failure.detail, "draw failed");
                        self.outcome = None;
                        self.failure = Some(failure);
                    }
                }
                Command::none()
            }

            Message::Exit => {
                // Exit the application
                std::process::exit(0);
            }
        }
    }

    fn view(&self) -> Element<Message> {
        let theme = self.theme.lock().unwrap();

        // Overlay for cloud connection dialog
        if self.cloud_dialog_open {
            return self.cloud_dialog_view(&theme);
        }

        let results = if let Some(failure) = &self.failure {
            self.render_failure(failure, &theme)
        } else if let Some(outcome) = &self.outcome {
            self.render_outcome(outcome, &theme)
        } else {
            text("按下按鈕，讓今天的水晶自己現身。")
                .size(16)
                .style(theme::Text::Color(theme.muted_fg))
                .into()
        };

        let body = column![
            self.header(&theme),
            self.draw_button(&theme),
            results,
        ]
        .spacing(18)
        .padding(20);

        let content = container(scrollable(body))
            .width(Length::Fill)
            .height(Length::Fill)
            .style(theme::Container::Custom(Box::new(ContainerStyle {
                bg: theme.bg,
                radius: 0.0,
            })));

        let main_content = column![content, self.footer(&theme)];

        container(main_content)
            .width(Length::Fill)
            .height(Length::Fill)
            .style(theme::Container::Custom(Box::new(ContainerStyle {
                bg: theme.bg,
                radius: 0.0,
            })))
            .into()
    }
}

impl CrystalDraw {
    fn header(&self, theme: &Styles) -> Element<Message> {
        let source_label = match &self.data_source {
            Some(DataSource::Cloud(_, sheet)) => format!("雲端試算表（{sheet}）"),
            Some(DataSource::Local(path)) => format!("本機檔案（{}）", path.display()),
            None => "尚未選擇資料來源".to_string(),
        };

        column![
            text("💎 今日水晶靈感")
                .size(32)
                .style(theme::Text::Color(theme.fg)),
            text(source_label)
                .size(14)
                .style(theme::Text::Color(theme.muted_fg)),
            text(&self.status_line)
                .size(16)
                .style(theme::Text::Color(theme.muted_fg)),
        ]
        .spacing(6)
        .into()
    }

    fn draw_button(&self, theme: &Styles) -> Element<Message> {
        let label = if self.drawing {
            "正在感應星象與能量..."
        } else {
            "🔮 開始今日抽籤"
        };

        let mut trigger = button(
            text(label)
                .size(20)
                .horizontal_alignment(Horizontal::Center)
                .style(theme::Text::Color(theme.fg)),
        )
        .width(Length::Fill)
        .padding(14)
        .style(theme::Button::Custom(Box::new(ButtonStyle {
            bg: theme.card_bg,
            fg: theme.fg,
            hover_bg: theme.button_hover_bg,
        })));

        if !self.drawing {
            trigger = trigger.on_press(Message::PerformDraw);
        }
        trigger.into()
    }

    fn render_failure(&self, failure: &DrawFailure, theme: &Styles) -> Element<Message> {
        let headline = match failure.kind {
            ErrorKind::Credentials => "⚠️ 憑證讀取失敗，請檢查服務帳號金鑰",
            ErrorKind::Connection => "⚠️ 連線發生錯誤，請檢查網路與試算表權限",
            ErrorKind::Data => "⚠️ 資料處理發生錯誤",
            ErrorKind::Config => "⚠️ 設定有誤，請檢查資料來源設定",
        };

        container(
            column![
                text(headline).size(18).style(theme::Text::Color(theme.fg)),
                text(&failure.detail)
                    .size(14)
                    .style(theme::Text::Color(theme.muted_fg)),
            ]
            .spacing(6),
        )
        .padding(12)
        .width(Length::Fill)
        .style(theme::Container::Custom(Box::new(ContainerStyle {
            bg: theme.card_bg,
            radius: 10.0,
        })))
        .into()
    }

    fn render_outcome(&self, outcome: &DrawOutcome, theme: &Styles) -> Element<Message> {
        if outcome.picks.is_empty() {
            return container(
                text("目前沒有可抽的水晶，請先在清單中把幾條標成 active。")
                    .size(16)
                    .style(theme::Text::Color(theme.fg)),
            )
            .padding(16)
            .width(Length::Fill)
            .style(theme::Container::Custom(Box::new(ContainerStyle {
                bg: theme.card_bg,
                radius: 10.0,
            })))
            .into();
        }

        let banner = container(
            column![
                text(format!("🌟 今日焦點：{}", outcome.focus.planet))
                    .size(22)
                    .style(theme::Text::Color(theme.banner_fg)),
                text(format!(
                    "本命盤：{} ｜ 幸運色：{}",
                    outcome.focus.natal_sign,
                    outcome.focus.lucky_colors.join(", ")
                ))
                .size(15)
                .style(theme::Text::Color(theme.banner_fg)),
            ]
            .spacing(4),
        )
        .padding(12)
        .width(Length::Fill)
        .style(theme::Container::Custom(Box::new(ContainerStyle {
            bg: theme.banner_bg,
            radius: 8.0,
        })));

        let cards = Row::with_children(
            outcome
                .picks
                .iter()
                .enumerate()
                .map(|(index, record)| self.render_card(index, record, theme))
                .collect(),
        )
        .spacing(12);

        let fortune = text(format!("📜 {}", outcome.quotation))
            .size(18)
            .style(theme::Text::Color(theme.fg));

        column![banner, cards, fortune].spacing(16).into()
    }

    fn render_card(&self, index: usize, record: &CrystalRecord, theme: &Styles) -> Element<Message> {
        let role = Role::for_index(index);

        container(
            column![
                text(role.label())
                    .size(14)
                    .style(theme::Text::Color(theme.accent_fg)),
                text(&record.name)
                    .size(22)
                    .style(theme::Text::Color(theme.fg)),
                text(format!("#{} | {}", record.id, record.style))
                    .size(14)
                    .style(theme::Text::Color(theme.muted_fg)),
                text(format!("材質：{}", record.main_crystal))
                    .size(14)
                    .style(theme::Text::Color(theme.muted_fg)),
            ]
            .spacing(4),
        )
        .padding(12)
        .width(Length::FillPortion(1))
        .style(theme::Container::Custom(Box::new(ContainerStyle {
            bg: theme.card_bg,
            radius: 10.0,
        })))
        .into()
    }

    fn footer(&self, theme: &Styles) -> Element<Message> {
        let footer_button = |label: &str, message: Message| {
            button(
                text(label)
                    .size(16)
                    .horizontal_alignment(Horizontal::Center)
                    .style(theme::Text::Color(theme.footer_fg)),
            )
            .padding([6, 12])
            .on_press(message)
            .style(theme::Button::Custom(Box::new(ButtonStyle {
                bg: theme.footer_bg,
                fg: theme.footer_fg,
                hover_bg: theme.button_hover_bg,
            })))
        };

        container(
            row![
                text(format!("水晶靈感抽籤 v{}", VERSION))
                    .size(14)
                    .style(theme::Text::Color(theme.footer_fg)),
                Space::with_width(Length::Fill),
                footer_button("☁ 雲端", Message::ShowCloudDialog),
                Space::with_width(Length::Fixed(10.0)),
                footer_button("📁 本機", Message::OpenLocalFile),
                Space::with_width(Length::Fixed(10.0)),
                footer_button("💡", Message::ToggleTheme),
                Space::with_width(Length::Fixed(10.0)),
                footer_button("✖", Message::Exit),
            ]
            .spacing(5)
            .padding(10)
            .align_items(Alignment::Center),
        )
        .width(Length::Fill)
        .style(theme::Container::Custom(Box::new(ContainerStyle {
            bg: theme.footer_bg,
            radius: 0.0,
        })))
        .into()
    }

    fn cloud_dialog_view(&self, theme: &Styles) -> Element<Message> {
        let dialog_button = |label: &str, message: Message| {
            button(
                text(label)
                    .size(16)
                    .horizontal_alignment(Horizontal::Center)
                    .style(theme::Text::Color(theme.footer_fg)),
            )
            .padding(10)
            .width(Length::Fixed(100.0))
            .on_press(message)
            .style(theme::Button::Custom(Box::new(ButtonStyle {
                bg: theme.footer_bg,
                fg: theme.footer_fg,
                hover_bg: theme.button_hover_bg,
            })))
        };

        let dialog_content = column![
            text("連結 Google 試算表")
                .size(24)
                .style(theme::Text::Color(theme.fg)),
            Space::with_height(Length::Fixed(20.0)),
            text("試算表網址：")
                .size(16)
                .style(theme::Text::Color(theme.fg)),
            text_input("貼上 Google Sheets 網址", &self.cloud_url_input)
                .padding(10)
                .width(Length::Fixed(400.0))
                .on_input(Message::UpdateCloudUrl),
            Space::with_height(Length::Fixed(10.0)),
            text("工作表名稱（選填）：")
                .size(16)
                .style(theme::Text::Color(theme.fg)),
            text_input("預設為 Sheet1", &self.cloud_sheet_input)
                .padding(10)
                .width(Length::Fixed(400.0))
                .on_input(Message::UpdateSheetName),
            Space::with_height(Length::Fixed(20.0)),
            row![
                dialog_button("連線", Message::ConnectToCloud),
                Space::with_width(Length::Fixed(20.0)),
                dialog_button("取消", Message::CloseCloudDialog),
            ],
        ]
        .spacing(10)
        .padding(20);

        let dialog = container(dialog_content)
            .width(Length::Fixed(460.0))
            .style(theme::Container::Custom(Box::new(ContainerStyle {
                bg: theme.card_bg,
                radius: 10.0,
            })));

        // Overlay dialog on top of dimmed background
        container(dialog)
            .width(Length::Fill)
            .height(Length::Fill)
            .center_x()
            .center_y()
            .style(theme::Container::Custom(Box::new(OverlayStyle)))
            .into()
    }
}

// Custom styles for containers and buttons
struct ContainerStyle {
    bg: Color,
    radius: f32,
}

impl container::StyleSheet for ContainerStyle {
    type Style = Theme;

    fn appearance(&self, _style: &Self::Style) -> container::Appearance {
        container::Appearance {
            background: Some(Background::Color(self.bg)),
            border_radius: self.radius.into(),
            border_width: 0.0,
            border_color: Color::TRANSPARENT,
            text_color: None,
        }
    }
}

struct OverlayStyle;

impl container::StyleSheet for OverlayStyle {
    type Style = Theme;

    fn appearance(&self, _style: &Self::Style) -> container::Appearance {
        container::Appearance {
            background: Some(Background::Color(Color::from_rgba(0.0, 0.0, 0.0, 0.7))),
            border_radius: 0.0.into(),
            border_width: 0.0,
            border_color: Color::TRANSPARENT,
            text_color: None,
        }
    }
}

struct ButtonStyle {
    bg: Color,
    fg: Color,
    hover_bg: Color,
}

impl button::StyleSheet for ButtonStyle {
    type Style = Theme;

    fn active(&self, _style: &Self::Style) -> button::Appearance {
        button::Appearance {
            shadow_offset: Vector::new(0.0, 0.0),
            background: Some(Background::Color(self.bg)),
            border_radius: 10.0.into(),
            border_width: 0.0,
            border_color: Color::TRANSPARENT,
            text_color: self.fg,
        }
    }

    fn hovered(&self, style: &Self::Style) -> button::Appearance {
        button::Appearance {
            background: Some(Background::Color(self.hover_bg)),
            ..self.active(style)
        }
    }
}
