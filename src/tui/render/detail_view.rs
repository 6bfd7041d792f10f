use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::model::{Comment, LinkDirection, WorkItem};
use crate::tui::app::{
    App, DetailField, DetailState, DraftField, LinksFlow, LinksPanel, PlanningForm, RelatedFlow,
    RelatedPanel, Section, SectionKind, iteration_display_order,
};
use crate::tui::markup::{SegmentKind, format_comment, summary_line};
use crate::util::number::format_number;
use crate::util::unicode::truncate_to_width;

use super::helpers::{base, dim, field_line, heading, input_spans, short_date};

const LABEL_WIDTH: usize = 12;
/// Comments shown at once when the section is expanded.
pub const COMMENT_WINDOW: usize = 5;

/// Render the detail view for the open work item
pub fn render_detail_view(frame: &mut Frame, app: &App, area: Rect) {
    let Some(detail) = &app.detail else {
        return;
    };
    let width = area.width as usize;
    let mut lines: Vec<Line<'static>> = Vec::new();

    let item = &detail.item;
    let f = &item.fields;
    lines.push(Line::from(vec![
        Span::styled(format!(" #{} ", item.id), heading(app)),
        Span::styled(
            f.work_item_type.clone(),
            Style::default()
                .fg(app.theme.type_color(&f.work_item_type))
                .bg(app.theme.background),
        ),
        Span::styled(" \u{00B7} ", dim(app)),
        Span::styled(
            f.state.clone(),
            Style::default()
                .fg(app.theme.state_color(&f.state))
                .bg(app.theme.background),
        ),
        Span::styled(format!("  rev {}", item.rev), dim(app)),
    ]));
    lines.push(Line::from(""));

    for field in DetailField::ALL {
        let focused = detail.focus == field;
        let value = input_spans(app, detail.field(field), focused && detail.editing);
        lines.push(field_line(app, field.label(), LABEL_WIDTH, value, focused));
    }

    lines.push(Line::from(""));
    let mut meta = vec![Span::styled(format!(" Area: {}", f.area_path), dim(app))];
    if f.priority > 0 {
        meta.push(Span::styled(format!("  Priority: {}", f.priority), dim(app)));
    }
    lines.push(Line::from(meta));
    if !f.description.is_empty() {
        lines.push(Line::from(Span::styled(
            format!(" {}", summary_line(&f.description, width.saturating_sub(4))),
            dim(app),
        )));
    }

    // Line index of the expanded section, used to keep it on screen
    let mut anchor = None;

    lines.push(Line::from(""));
    if detail.section.is_expanded(SectionKind::Comments) {
        anchor = Some(lines.len());
    }
    comments_lines(app, detail, width, &mut lines);

    lines.push(Line::from(""));
    if detail.section.is_expanded(SectionKind::Related) {
        anchor = Some(lines.len());
    }
    related_lines(app, detail, width, &mut lines);

    lines.push(Line::from(""));
    if detail.section.is_expanded(SectionKind::Iteration) {
        anchor = Some(lines.len());
    }
    iteration_lines(app, detail, width, &mut lines);

    lines.push(Line::from(""));
    if detail.section.is_expanded(SectionKind::Planning) {
        anchor = Some(lines.len());
    }
    planning_lines(app, detail, &mut lines);

    if let Some(panel) = &detail.links {
        lines.push(Line::from(""));
        if anchor.is_none() {
            anchor = Some(lines.len());
        }
        links_lines(app, detail, panel, width, &mut lines);
    }

    let height = area.height as usize;
    let scroll = match anchor {
        Some(line) if line + COMMENT_WINDOW * 2 > height => {
            line.saturating_sub(height / 3).min(lines.len().saturating_sub(1))
        }
        _ => 0,
    };
    let paragraph = Paragraph::new(lines)
        .style(base(app))
        .scroll((scroll as u16, 0));
    frame.render_widget(paragraph, area);
}

fn section_header(app: &App, title: &str, key: char, expanded: bool) -> Line<'static> {
    let marker = if expanded { "\u{25BE}" } else { "\u{25B8}" };
    Line::from(vec![
        Span::styled(format!(" {marker} {title}"), heading(app)),
        Span::styled(format!("  [{key}]"), dim(app)),
    ])
}

fn comment_author(comment: &Comment) -> &str {
    let who = &comment.created_by;
    if who.display_name.is_empty() {
        &who.unique_name
    } else {
        &who.display_name
    }
}

fn comments_lines(app: &App, detail: &DetailState, width: usize, lines: &mut Vec<Line<'static>>) {
    let total = detail.comments.len();
    let scroll = match detail.section {
        Section::Comments { scroll } => Some(scroll),
        _ => None,
    };
    lines.push(section_header(
        app,
        &format!("Comments ({total})"),
        'v',
        scroll.is_some(),
    ));

    if detail.comments_loading && total == 0 {
        lines.push(Line::from(Span::styled("   Loading\u{2026}", dim(app))));
        return;
    }
    if total == 0 {
        lines.push(Line::from(Span::styled("   No comments", dim(app))));
        return;
    }

    let Some(scroll) = scroll else {
        if let Some(latest) = detail.latest_comment() {
            lines.push(Line::from(Span::styled(
                format!(
                    "   Latest: {} ({})",
                    comment_author(latest),
                    short_date(&latest.created_date)
                ),
                dim(app),
            )));
        }
        return;
    };

    let start = scroll.min(total - 1);
    let end = (start + COMMENT_WINDOW).min(total);
    for comment in &detail.comments[start..end] {
        lines.push(Line::from(vec![
            Span::styled(
                format!("   {}", comment_author(comment)),
                Style::default()
                    .fg(app.theme.text_bright)
                    .bg(app.theme.background),
            ),
            Span::styled(format!(" ({})", short_date(&comment.created_date)), dim(app)),
        ]));
        comment_body_lines(app, &comment.text, width, lines);
    }
    if total > COMMENT_WINDOW {
        lines.push(Line::from(Span::styled(
            format!("   Showing {}\u{2013}{end} of {total}", start + 1),
            dim(app),
        )));
    }
}

/// Styled body lines. Segments can span newlines, so lines are rebuilt by
/// splitting each segment on `\n`.
fn comment_body_lines(app: &App, html: &str, width: usize, lines: &mut Vec<Line<'static>>) {
    let mut current: Vec<Span<'static>> = vec![Span::styled("     ", base(app))];
    for segment in format_comment(html) {
        let style = match segment.kind {
            SegmentKind::Text => base(app),
            SegmentKind::Mention => Style::default()
                .fg(app.theme.mention)
                .bg(app.theme.background)
                .add_modifier(Modifier::BOLD),
            SegmentKind::Link => Style::default()
                .fg(app.theme.link)
                .bg(app.theme.background)
                .add_modifier(Modifier::UNDERLINED),
        };
        let mut parts = segment.text.split('\n').peekable();
        while let Some(part) = parts.next() {
            if !part.is_empty() {
                current.push(Span::styled(
                    truncate_to_width(part, width.saturating_sub(6)),
                    style,
                ));
            }
            if parts.peek().is_some() {
                lines.push(Line::from(std::mem::replace(
                    &mut current,
                    vec![Span::styled("     ", base(app))],
                )));
            }
        }
    }
    if current.len() > 1 {
        lines.push(Line::from(current));
    }
}

fn related_entry(
    app: &App,
    direction: LinkDirection,
    item: &WorkItem,
    width: usize,
    selected: bool,
) -> Line<'static> {
    let bg = if selected {
        app.theme.selection_bg
    } else {
        app.theme.background
    };
    let arrow = match direction {
        LinkDirection::Parent => "\u{2191} parent",
        LinkDirection::Child => "\u{2193} child ",
    };
    let f = &item.fields;
    let title = truncate_to_width(&f.title, width.saturating_sub(40));
    Line::from(vec![
        Span::styled(
            if selected { "  \u{25B8} " } else { "    " },
            Style::default().fg(app.theme.highlight).bg(bg),
        ),
        Span::styled(format!("{arrow} "), Style::default().fg(app.theme.dim).bg(bg)),
        Span::styled(format!("#{} ", item.id), Style::default().fg(app.theme.dim).bg(bg)),
        Span::styled(
            format!("[{}] ", f.work_item_type),
            Style::default().fg(app.theme.type_color(&f.work_item_type)).bg(bg),
        ),
        Span::styled(title, Style::default().fg(app.theme.text_bright).bg(bg)),
        Span::styled(
            format!(" ({})", f.state),
            Style::default().fg(app.theme.state_color(&f.state)).bg(bg),
        ),
    ])
}

fn related_lines(app: &App, detail: &DetailState, width: usize, lines: &mut Vec<Line<'static>>) {
    let related = &detail.related;
    let panel = match &detail.section {
        Section::Related(panel) => Some(panel),
        _ => None,
    };
    lines.push(section_header(
        app,
        &format!("Related ({})", related.len()),
        'r',
        panel.is_some(),
    ));

    if detail.related_loading {
        lines.push(Line::from(Span::styled("   Loading\u{2026}", dim(app))));
        return;
    }

    let Some(RelatedPanel { cursor, flow }) = panel else {
        if let Some(parent) = &related.parent {
            lines.push(Line::from(Span::styled(
                format!(
                    "   Parent: #{} {}",
                    parent.id,
                    truncate_to_width(parent.title(), width.saturating_sub(20))
                ),
                dim(app),
            )));
        }
        if !related.children.is_empty() {
            lines.push(Line::from(Span::styled(
                format!("   Children: {}", related.children.len()),
                dim(app),
            )));
        }
        return;
    };

    let entries = related.entries();
    if entries.is_empty() {
        lines.push(Line::from(Span::styled("   No parent or children", dim(app))));
    }
    for (i, (direction, item)) in entries.into_iter().enumerate() {
        let selected = i == *cursor && matches!(flow, RelatedFlow::Browsing);
        lines.push(related_entry(app, direction, item, width, selected));
    }

    match flow {
        RelatedFlow::Browsing => lines.push(Line::from(Span::styled(
            "   Enter open  d unlink  n new child  N new parent",
            dim(app),
        ))),
        RelatedFlow::ConfirmUnlink { target_id, .. } => lines.push(Line::from(Span::styled(
            format!("   Remove link to #{target_id}? (y/n)"),
            Style::default().fg(app.theme.red).bg(app.theme.background),
        ))),
        RelatedFlow::Creating(draft) => {
            let kind = if draft.as_child { "child" } else { "parent" };
            lines.push(Line::from(Span::styled(
                format!("   New {kind} of #{}", detail.item.id),
                heading(app),
            )));
            lines.push(field_line(
                app,
                "Title",
                LABEL_WIDTH,
                input_spans(app, &draft.title, draft.focus == DraftField::Title),
                draft.focus == DraftField::Title,
            ));
            lines.push(field_line(
                app,
                "Assigned To",
                LABEL_WIDTH,
                input_spans(app, &draft.assignee, draft.focus == DraftField::Assignee),
                draft.focus == DraftField::Assignee,
            ));
            let type_name = app.type_name(draft.type_index);
            lines.push(field_line(
                app,
                "Type",
                LABEL_WIDTH,
                vec![Span::styled(
                    type_name.to_string(),
                    Style::default()
                        .fg(app.theme.type_color(type_name))
                        .bg(app.theme.background),
                )],
                draft.focus == DraftField::Type,
            ));
        }
    }
}

fn iteration_lines(app: &App, detail: &DetailState, width: usize, lines: &mut Vec<Line<'static>>) {
    let current = &detail.item.fields.iteration_path;
    let cursor = match detail.section {
        Section::Iteration { cursor } => Some(cursor),
        _ => None,
    };
    lines.push(section_header(app, "Iteration", 'i', cursor.is_some()));
    let shown = if current.is_empty() { "(none)" } else { current.as_str() };

    let Some(cursor) = cursor else {
        lines.push(Line::from(Span::styled(format!("   {shown}"), dim(app))));
        return;
    };
    let Some(iterations) = &app.cache.iterations else {
        lines.push(Line::from(Span::styled("   Loading\u{2026}", dim(app))));
        return;
    };
    if iterations.is_empty() {
        lines.push(Line::from(Span::styled("   No iterations for this team", dim(app))));
    }
    for (i, iteration) in iteration_display_order(iterations, current).into_iter().enumerate() {
        let selected = i == cursor;
        let bg = if selected {
            app.theme.selection_bg
        } else {
            app.theme.background
        };
        let is_current = iteration.path == *current;
        let mut spans = vec![
            Span::styled(
                if selected { "  \u{25B8} " } else { "    " },
                Style::default().fg(app.theme.highlight).bg(bg),
            ),
            Span::styled(
                if is_current { "\u{25CF} " } else { "  " },
                Style::default().fg(app.theme.green).bg(bg),
            ),
            Span::styled(
                truncate_to_width(&iteration.name, width.saturating_sub(30)),
                Style::default().fg(app.theme.text_bright).bg(bg),
            ),
        ];
        if let Some(attrs) = &iteration.attributes
            && !attrs.time_frame.is_empty()
        {
            spans.push(Span::styled(
                format!("  {}", attrs.time_frame),
                Style::default().fg(app.theme.dim).bg(bg),
            ));
        }
        lines.push(Line::from(spans));
    }
}

fn planning_lines(app: &App, detail: &DetailState, lines: &mut Vec<Line<'static>>) {
    let form = match &detail.section {
        Section::Planning(form) => Some(form),
        _ => None,
    };
    lines.push(section_header(app, "Planning", 'p', form.is_some()));

    let work_item_type = &detail.item.fields.work_item_type;
    let fields = app.cache.planning.get(work_item_type);

    let Some(PlanningForm {
        focus,
        inputs,
        loading,
    }) = form
    else {
        // Collapsed: the values the item currently carries
        let summary: Vec<String> = fields
            .into_iter()
            .flatten()
            .filter_map(|field| {
                detail
                    .item
                    .planning_value(&field.reference_name)
                    .map(|v| format!("{} {}", field.display_name, format_number(v)))
            })
            .collect();
        if !summary.is_empty() {
            lines.push(Line::from(Span::styled(
                format!("   {}", summary.join(" \u{00B7} ")),
                dim(app),
            )));
        }
        return;
    };

    if *loading {
        lines.push(Line::from(Span::styled(
            "   Loading planning fields\u{2026}",
            dim(app),
        )));
        return;
    }
    let fields = fields.map(Vec::as_slice).unwrap_or_default();
    if fields.is_empty() {
        lines.push(Line::from(Span::styled(
            format!("   No planning fields for {work_item_type}"),
            dim(app),
        )));
        return;
    }
    for (i, (field, input)) in fields.iter().zip(inputs).enumerate() {
        let focused = i == *focus;
        let mut value = input_spans(app, input, focused);
        let current = detail
            .item
            .planning_value(&field.reference_name)
            .map_or_else(|| "unset".to_string(), format_number);
        value.push(Span::styled(format!("  (current: {current})"), dim(app)));
        lines.push(field_line(app, &field.display_name, 20, value, focused));
    }
}

fn links_lines(
    app: &App,
    detail: &DetailState,
    panel: &LinksPanel,
    width: usize,
    lines: &mut Vec<Line<'static>>,
) {
    lines.push(section_header(
        app,
        &format!("Links ({})", detail.hyperlinks.len()),
        'u',
        true,
    ));
    if detail.hyperlinks.is_empty() {
        lines.push(Line::from(Span::styled("   No external links", dim(app))));
    }
    let browsing = matches!(panel.flow, LinksFlow::Browsing);
    for (i, link) in detail.hyperlinks.iter().enumerate() {
        let selected = browsing && i == panel.cursor;
        let bg = if selected {
            app.theme.selection_bg
        } else {
            app.theme.background
        };
        let mut spans = vec![
            Span::styled(
                if selected { "  \u{25B8} " } else { "    " },
                Style::default().fg(app.theme.highlight).bg(bg),
            ),
            Span::styled(
                truncate_to_width(&link.url, width.saturating_sub(8)),
                Style::default()
                    .fg(app.theme.link)
                    .bg(bg)
                    .add_modifier(Modifier::UNDERLINED),
            ),
        ];
        if !link.comment.is_empty() {
            spans.push(Span::styled(
                format!("  {}", truncate_to_width(&link.comment, 40)),
                Style::default().fg(app.theme.dim).bg(bg),
            ));
        }
        lines.push(Line::from(spans));
    }

    match &panel.flow {
        LinksFlow::Browsing => lines.push(Line::from(Span::styled(
            "   a add  d remove",
            dim(app),
        ))),
        LinksFlow::Adding {
            url,
            comment,
            on_comment,
        } => {
            lines.push(field_line(
                app,
                "URL",
                LABEL_WIDTH,
                input_spans(app, url, !*on_comment),
                !*on_comment,
            ));
            lines.push(field_line(
                app,
                "Comment",
                LABEL_WIDTH,
                input_spans(app, comment, *on_comment),
                *on_comment,
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Hyperlink, IdentityRef, Iteration, PlanningField, Related};
    use crate::tui::render::test_helpers::*;

    fn comment(id: i64, author: &str, date: &str, text: &str) -> Comment {
        Comment {
            id,
            text: text.into(),
            created_by: IdentityRef {
                display_name: author.into(),
                unique_name: String::new(),
            },
            created_date: date.into(),
        }
    }

    fn render(app: &App) -> String {
        render_to_string(100, 60, |frame, area| render_detail_view(frame, app, area))
    }

    #[test]
    fn collapsed_comments_show_latest_author_and_date() {
        let mut app = detail_app(work_item(7, "Fix login", "Bug", "Active"));
        if let Some(d) = app.detail.as_mut() {
            d.comments_loading = false;
            d.comments = vec![
                comment(1, "Ada", "2026-01-01T09:00:00Z", "first"),
                comment(2, "Grace", "2026-01-02T09:00:00Z", "second"),
            ];
        }
        let output = render(&app);
        assert!(output.contains("#7"));
        assert!(output.contains("Fix login"));
        assert!(output.contains("Comments (2)"));
        assert!(output.contains("Latest: Grace (Jan 02)"));
        assert!(!output.contains("second"));
    }

    #[test]
    fn expanded_comments_window_and_counter() {
        let mut app = detail_app(work_item(7, "Fix login", "Bug", "Active"));
        if let Some(d) = app.detail.as_mut() {
            d.comments_loading = false;
            d.comments = (1..=7)
                .map(|i| comment(i, "Ada", "2026-01-01T09:00:00Z", &format!("note {i}")))
                .collect();
            d.section = Section::Comments { scroll: 1 };
        }
        let output = render(&app);
        assert!(output.contains("note 2"));
        assert!(output.contains("note 6"));
        assert!(!output.contains("note 7"));
        assert!(output.contains("Showing 2\u{2013}6 of 7"));
    }

    #[test]
    fn comment_markup_is_reduced_to_text() {
        let mut app = detail_app(work_item(7, "Fix login", "Bug", "Active"));
        if let Some(d) = app.detail.as_mut() {
            d.comments_loading = false;
            d.comments = vec![comment(
                1,
                "Ada",
                "2026-01-01T09:00:00Z",
                "<div>See <a href=\"https://example.com/x\">the doc</a> &amp; retry</div>",
            )];
            d.section = Section::Comments { scroll: 0 };
        }
        let output = render(&app);
        assert!(output.contains("the doc"));
        assert!(output.contains("& retry"));
        assert!(!output.contains("<div>"));
    }

    #[test]
    fn related_panel_lists_parent_first() {
        let mut app = detail_app(work_item(7, "Fix login", "Bug", "Active"));
        if let Some(d) = app.detail.as_mut() {
            d.related_loading = false;
            d.related = Related {
                parent: Some(work_item(1, "Auth epic", "Epic", "Active")),
                children: vec![work_item(8, "Add test", "Task", "New")],
            };
            d.section = Section::Related(RelatedPanel::default());
        }
        let output = render(&app);
        let parent = output.find("Auth epic").expect("parent shown");
        let child = output.find("Add test").expect("child shown");
        assert!(parent < child);
        assert!(output.contains("\u{2191} parent"));
    }

    #[test]
    fn iteration_list_marks_current_first() {
        let mut app = detail_app(work_item(7, "Fix login", "Bug", "Active"));
        app.cache.iterations = Some(vec![
            Iteration {
                name: "Sprint 1".into(),
                path: "Web\\Sprint 1".into(),
                ..Default::default()
            },
            Iteration {
                name: "Sprint 2".into(),
                path: "Web\\Sprint 2".into(),
                ..Default::default()
            },
        ]);
        if let Some(d) = app.detail.as_mut() {
            d.item.fields.iteration_path = "Web\\Sprint 2".into();
            d.section = Section::Iteration { cursor: 0 };
        }
        let output = render(&app);
        let first = output.find("Sprint 2").expect("current shown");
        let second = output.find("Sprint 1").expect("other shown");
        assert!(first < second);
        assert!(output.contains("\u{25CF} Sprint 2"));
    }

    #[test]
    fn planning_form_shows_current_values() {
        let mut item = work_item(7, "Fix login", "Task", "Active");
        item.fields.remaining_work = Some(4.0);
        let mut app = detail_app(item);
        app.cache.planning.insert(
            "Task".into(),
            vec![PlanningField {
                reference_name: "Microsoft.VSTS.Scheduling.RemainingWork".into(),
                display_name: "Remaining Work".into(),
                value: Some(4.0),
            }],
        );
        if let Some(d) = app.detail.as_mut() {
            d.section = Section::Planning(PlanningForm::with_fields(1));
        }
        let output = render(&app);
        assert!(output.contains("Remaining Work"));
        assert!(output.contains("(current: 4)"));
    }

    #[test]
    fn links_panel_shows_urls() {
        let mut app = detail_app(work_item(7, "Fix login", "Bug", "Active"));
        if let Some(d) = app.detail.as_mut() {
            d.hyperlinks = vec![Hyperlink {
                url: "https://example.com/spec".into(),
                name: String::new(),
                comment: "design notes".into(),
            }];
            d.links = Some(LinksPanel::default());
        }
        let output = render(&app);
        assert!(output.contains("Links (1)"));
        assert!(output.contains("https://example.com/spec"));
        assert!(output.contains("design notes"));
    }
}
