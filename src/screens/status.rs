/// System status screen rendering
///
/// Cards for hostname and SPR version, uptime and load lists, the
/// container table, and the volume-mounts modal and logs-route view
/// layered on top.

use chrono::{DateTime, Local};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Wrap},
    Frame,
};

use crate::core::poller::StatusUpdate;
use crate::core::status::{ContainerSummary, MountInfo, UptimeInfo};
use crate::utils::{logs_route, nice_key, truncate_string, LOAD_KEYS, UPTIME_KEYS};

/// Navigation target produced by the container actions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    ContainerLogs(String),
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Route::ContainerLogs(name) => logs_route(name),
        }
    }
}

/// Body content of the shared details modal
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalBody {
    Empty,
    Mounts(Vec<MountInfo>),
    Text(String),
}

/// Single shared modal. A second `show` while open just replaces the
/// content in place; there is no queueing.
#[derive(Debug, Clone)]
pub struct Modal {
    pub title: String,
    pub body: ModalBody,
    pub open: bool,
}

impl Modal {
    pub fn closed() -> Self {
        Self {
            title: String::new(),
            body: ModalBody::Empty,
            open: false,
        }
    }

    pub fn show(&mut self, title: String, body: ModalBody) {
        self.title = title;
        self.body = body;
        self.open = true;
    }

    pub fn close(&mut self) {
        self.open = false;
    }
}

/// View-local state for the status dashboard. Every field written here
/// comes from a poller update or a key press on the UI thread.
pub struct StatusScreen {
    pub hostname: String,
    pub version: String,
    pub uptime: UptimeInfo,
    pub containers: Vec<ContainerSummary>,
    pub selected: usize,
    pub modal: Modal,
    pub logs_view: Option<Route>,
    pub status_message: Option<String>,
    pub show_help: bool,
    pub last_update: Option<DateTime<Local>>,
}

impl StatusScreen {
    pub fn new() -> Self {
        Self {
            hostname: String::new(),
            version: String::new(),
            uptime: UptimeInfo::default(),
            containers: Vec::new(),
            selected: 0,
            modal: Modal::closed(),
            logs_view: None,
            status_message: None,
            show_help: false,
            last_update: None,
        }
    }

    /// Apply one poller update, replacing the panel wholesale
    pub fn apply(&mut self, update: StatusUpdate) {
        match update {
            StatusUpdate::Uptime(uptime) => self.uptime = uptime,
            StatusUpdate::Containers(containers) => {
                self.containers = containers;
                self.selected = self.selected.min(self.containers.len().saturating_sub(1));
            }
            StatusUpdate::Hostname(hostname) => self.hostname = hostname,
            StatusUpdate::Version(version) => self.version = version,
        }
        self.last_update = Some(Local::now());
    }

    pub fn selected_container(&self) -> Option<&ContainerSummary> {
        self.containers.get(self.selected)
    }

    pub fn select_next(&mut self) {
        if !self.containers.is_empty() {
            self.selected = (self.selected + 1).min(self.containers.len() - 1);
        }
    }

    pub fn select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Open the volume-mounts modal for the selected container
    pub fn open_mounts_modal(&mut self) {
        if let Some(container) = self.selected_container() {
            let title = format!("{} Volume Mounts", container.display_name());
            let mounts = container.mounts.clone();
            self.modal.show(title, ModalBody::Mounts(mounts));
        }
    }

    /// Navigate to the logs route for the selected container
    pub fn open_logs_view(&mut self) {
        if let Some(container) = self.selected_container() {
            self.logs_view = Some(Route::ContainerLogs(container.display_name()));
        }
    }

    pub fn render(&self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // hostname / version cards
                Constraint::Length(5), // uptime + load lists
                Constraint::Min(5),    // container table
                Constraint::Length(3), // footer
            ])
            .split(frame.size());

        self.render_cards(frame, chunks[0]);
        self.render_uptime(frame, chunks[1]);
        self.render_containers(frame, chunks[2]);
        self.render_footer(frame, chunks[3]);

        if let Some(ref route) = self.logs_view {
            self.render_logs_view(frame, route);
        }

        if self.modal.open {
            self.render_modal(frame);
        }

        if self.show_help {
            self.render_help(frame);
        }
    }

    fn render_cards(&self, frame: &mut Frame, area: Rect) {
        let cards = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(area);

        let hostname = Paragraph::new(Line::from(vec![
            Span::styled("Hostname  ", Style::default().fg(Color::Gray)),
            Span::styled(&self.hostname, Style::default().fg(Color::White).add_modifier(Modifier::BOLD)),
        ]))
        .block(Block::default().borders(Borders::ALL));
        frame.render_widget(hostname, cards[0]);

        let version = Paragraph::new(Line::from(vec![
            Span::styled("SPR Version  ", Style::default().fg(Color::Gray)),
            Span::styled(&self.version, Style::default().fg(Color::White).add_modifier(Modifier::BOLD)),
        ]))
        .block(Block::default().borders(Borders::ALL));
        frame.render_widget(version, cards[1]);
    }

    fn render_uptime(&self, frame: &mut Frame, area: Rect) {
        let lists = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(area);

        self.render_key_list(frame, lists[0], "System", UPTIME_KEYS);
        self.render_key_list(frame, lists[1], "Load", LOAD_KEYS);
    }

    fn render_key_list(&self, frame: &mut Frame, area: Rect, title: &str, keys: &[&str]) {
        let rows: Vec<Row> = keys
            .iter()
            .map(|key| {
                Row::new(vec![
                    Cell::from(nice_key(key)),
                    Cell::from(Span::styled(
                        self.uptime.get(key).to_string(),
                        Style::default().fg(Color::Gray),
                    )),
                ])
            })
            .collect();

        let table = Table::new(rows, [Constraint::Length(12), Constraint::Min(8)])
            .block(Block::default().borders(Borders::ALL).title(title));

        frame.render_widget(table, area);
    }

    fn render_containers(&self, frame: &mut Frame, area: Rect) {
        // Status column is dropped first on narrow terminals
        let show_status = area.width >= 90;

        let mut header_cells = vec!["Name", "Image", "State"];
        if show_status {
            header_cells.push("Status");
        }
        let header = Row::new(header_cells)
            .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
            .bottom_margin(1);

        let rows: Vec<Row> = self
            .containers
            .iter()
            .enumerate()
            .map(|(idx, container)| {
                let mut cells = vec![
                    Cell::from(container.display_name()),
                    Cell::from(Span::styled(
                        truncate_string(&container.image, 38),
                        Style::default().fg(Color::Gray),
                    )),
                    Cell::from(Span::styled(
                        container.state.clone(),
                        Style::default().fg(container.lifecycle().tone()),
                    )),
                ];
                if show_status {
                    cells.push(Cell::from(Span::styled(
                        container.status.clone(),
                        Style::default().fg(Color::Gray),
                    )));
                }

                let row = Row::new(cells);
                if idx == self.selected {
                    row.style(Style::default().add_modifier(Modifier::REVERSED))
                } else {
                    row
                }
            })
            .collect();

        let widths: Vec<Constraint> = if show_status {
            vec![
                Constraint::Length(24),
                Constraint::Length(40),
                Constraint::Length(10),
                Constraint::Min(20),
            ]
        } else {
            vec![
                Constraint::Length(24),
                Constraint::Min(24),
                Constraint::Length(10),
            ]
        };

        let table = Table::new(rows, widths)
            .header(header)
            .block(Block::default().borders(Borders::ALL).title("Docker Containers"));

        frame.render_widget(table, area);
    }

    fn render_footer(&self, frame: &mut Frame, area: Rect) {
        let footer_text = if let Some(ref status) = self.status_message {
            status.clone()
        } else if self.modal.open {
            "[Esc] Close".to_string()
        } else if self.logs_view.is_some() {
            "[Esc] Back".to_string()
        } else {
            "[↑↓] Select | [m] Mounts | [l] Logs | [?] Help | [q]uit".to_string()
        };

        let style = if self.status_message.is_some() {
            Style::default().fg(Color::Red)
        } else {
            Style::default()
        };

        let refreshed = self
            .last_update
            .map(|t| format!(" Updated {} ", t.format("%H:%M:%S")))
            .unwrap_or_default();

        let footer = Paragraph::new(footer_text)
            .alignment(Alignment::Center)
            .style(style)
            .block(Block::default().borders(Borders::ALL).title(refreshed));

        frame.render_widget(footer, area);
    }

    fn render_logs_view(&self, frame: &mut Frame, route: &Route) {
        let Route::ContainerLogs(name) = route;

        let text = vec![
            Line::from(""),
            Line::from(vec![
                Span::styled("Container: ", Style::default().fg(Color::Gray)),
                Span::styled(name.clone(), Style::default().fg(Color::White).add_modifier(Modifier::BOLD)),
            ]),
            Line::from(vec![
                Span::styled("Route:     ", Style::default().fg(Color::Gray)),
                Span::styled(route.path(), Style::default().fg(Color::Cyan)),
            ]),
            Line::from(""),
            Line::from(Span::styled(
                "Log streaming lives in the admin UI; this view hands off to it.",
                Style::default().fg(Color::DarkGray),
            )),
        ];

        let area = frame.size();
        frame.render_widget(Clear, area);
        let widget = Paragraph::new(text)
            .block(Block::default().borders(Borders::ALL).title(" Logs "))
            .wrap(Wrap { trim: true });
        frame.render_widget(widget, area);
    }

    fn render_modal(&self, frame: &mut Frame) {
        let popup_area = centered_rect(frame.size(), 70, 60);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(Span::styled(
                format!(" {} ", self.modal.title),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ));

        match &self.modal.body {
            ModalBody::Mounts(mounts) => {
                let header = Row::new(vec!["Source", "Destination", "Mode"])
                    .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
                    .bottom_margin(1);

                let rows: Vec<Row> = mounts
                    .iter()
                    .map(|mount| {
                        Row::new(vec![
                            Cell::from(mount.source.clone()),
                            Cell::from(Span::styled(
                                mount.destination.clone(),
                                Style::default().fg(Color::Gray),
                            )),
                            Cell::from(Span::styled(
                                mount.mode.clone(),
                                Style::default().fg(Color::Cyan),
                            )),
                        ])
                    })
                    .collect();

                let table = Table::new(
                    rows,
                    [
                        Constraint::Percentage(45),
                        Constraint::Percentage(40),
                        Constraint::Length(8),
                    ],
                )
                .header(header)
                .block(block);

                frame.render_widget(table, popup_area);
            }
            ModalBody::Text(text) => {
                let widget = Paragraph::new(text.clone())
                    .block(block)
                    .wrap(Wrap { trim: true });
                frame.render_widget(widget, popup_area);
            }
            ModalBody::Empty => {
                frame.render_widget(block, popup_area);
            }
        }
    }

    fn render_help(&self, frame: &mut Frame) {
        let popup_area = centered_rect(frame.size(), 60, 50);

        let help_text = vec![
            Line::from(Span::styled(
                "SPR Status - Keyboard Shortcuts",
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from("  [↑ ↓] / [j k]  Select container"),
            Line::from("  [m]            View volume mounts"),
            Line::from("  [l]            View logs"),
            Line::from("  [Esc]          Close modal / go back"),
            Line::from("  [q]            Quit"),
            Line::from(""),
            Line::from(Span::styled(
                "Press [?] or [Esc] to close this help",
                Style::default().fg(Color::Gray).add_modifier(Modifier::ITALIC),
            )),
        ];

        frame.render_widget(Clear, popup_area);
        let widget = Paragraph::new(help_text)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Cyan))
                    .title(Span::styled(
                        " Help ",
                        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                    )),
            )
            .wrap(Wrap { trim: true });

        frame.render_widget(widget, popup_area);
    }
}

impl Default for StatusScreen {
    fn default() -> Self {
        Self::new()
    }
}

fn centered_rect(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let width = area.width * percent_x / 100;
    let height = area.height * percent_y / 100;
    Rect {
        x: (area.width.saturating_sub(width)) / 2,
        y: (area.height.saturating_sub(height)) / 2,
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};
    use serde_json::json;

    fn container(name: &str, mounts: usize) -> ContainerSummary {
        serde_json::from_value(json!({
            "Id": format!("id-{}", name),
            "Names": [format!("/{}", name)],
            "Image": "ghcr.io/spr-networks/super_base",
            "State": "running",
            "Status": "Up 2 hours",
            "Mounts": (0..mounts).map(|i| json!({
                "Source": format!("/data/{}", i),
                "Destination": format!("/mnt/{}", i),
                "Mode": "rw",
                "Type": "bind"
            })).collect::<Vec<_>>()
        }))
        .unwrap()
    }

    #[test]
    fn test_modal_show_replaces_content_in_place() {
        let mut modal = Modal::closed();
        assert!(!modal.open);

        modal.show("first".to_string(), ModalBody::Text("a".to_string()));
        assert!(modal.open);
        assert_eq!(modal.title, "first");

        // Second show while open replaces, no queueing
        modal.show("second".to_string(), ModalBody::Text("b".to_string()));
        assert!(modal.open);
        assert_eq!(modal.title, "second");
        assert_eq!(modal.body, ModalBody::Text("b".to_string()));

        modal.close();
        assert!(!modal.open);
    }

    #[test]
    fn test_open_mounts_modal_sets_title_and_rows() {
        let mut screen = StatusScreen::new();
        screen.apply(StatusUpdate::Containers(vec![container("api", 2)]));

        screen.open_mounts_modal();

        assert!(screen.modal.open);
        assert_eq!(screen.modal.title, "api Volume Mounts");
        match &screen.modal.body {
            ModalBody::Mounts(mounts) => {
                assert_eq!(mounts.len(), 2);
                assert_eq!(mounts[0].source, "/data/0");
                assert_eq!(mounts[1].source, "/data/1");
            }
            other => panic!("expected mounts body, got {:?}", other),
        }
    }

    #[test]
    fn test_open_mounts_modal_without_containers_is_noop() {
        let mut screen = StatusScreen::new();
        screen.open_mounts_modal();
        assert!(!screen.modal.open);
    }

    #[test]
    fn test_logs_view_route() {
        let mut screen = StatusScreen::new();
        screen.apply(StatusUpdate::Containers(vec![container("dns", 0)]));

        screen.open_logs_view();

        let route = screen.logs_view.as_ref().unwrap();
        assert_eq!(*route, Route::ContainerLogs("dns".to_string()));
        assert_eq!(route.path(), "/admin/logs/dns");
    }

    #[test]
    fn test_apply_replaces_wholesale_and_clamps_selection() {
        let mut screen = StatusScreen::new();
        screen.apply(StatusUpdate::Containers(vec![
            container("a", 0),
            container("b", 0),
            container("c", 0),
        ]));
        screen.selected = 2;

        screen.apply(StatusUpdate::Containers(vec![container("a", 0)]));
        assert_eq!(screen.containers.len(), 1);
        assert_eq!(screen.selected, 0);

        screen.apply(StatusUpdate::Hostname("router1".to_string()));
        assert_eq!(screen.hostname, "router1");
        assert!(screen.last_update.is_some());
    }

    #[test]
    fn test_selection_bounds() {
        let mut screen = StatusScreen::new();
        screen.select_next();
        screen.select_previous();
        assert_eq!(screen.selected, 0);

        screen.apply(StatusUpdate::Containers(vec![
            container("a", 0),
            container("b", 0),
        ]));
        screen.select_next();
        screen.select_next();
        screen.select_next();
        assert_eq!(screen.selected, 1);
        screen.select_previous();
        assert_eq!(screen.selected, 0);
    }

    #[test]
    fn test_render_shows_cards_and_rows() {
        let mut screen = StatusScreen::new();
        screen.apply(StatusUpdate::Hostname("router1".to_string()));
        screen.apply(StatusUpdate::Version("1.2.3".to_string()));
        screen.apply(StatusUpdate::Uptime(UptimeInfo {
            time: "10:00".to_string(),
            uptime: "2 days".to_string(),
            users: "1".to_string(),
            load_1m: "0.1".to_string(),
            load_5m: "0.2".to_string(),
            load_15m: "0.3".to_string(),
        }));
        screen.apply(StatusUpdate::Containers(vec![container("api", 0)]));

        let backend = TestBackend::new(120, 30);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| screen.render(f)).unwrap();

        let rendered = format!("{:?}", terminal.backend().buffer());
        assert!(rendered.contains("router1"));
        assert!(rendered.contains("1.2.3"));
        assert!(rendered.contains("Load 1 min"));
        assert!(rendered.contains("api"));
    }
}
