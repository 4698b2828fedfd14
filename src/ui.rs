use anyhow::{anyhow, Result};
use console::{style, Key, Term};
use dialoguer::Input;

pub enum MenuChoice {
    Back,
    Quit,
    Index(usize),
}

pub fn prompt_menu(prompt: &str, items: &[&str], header: Option<&str>) -> Result<MenuChoice> {
    let labels: Vec<String> = items.iter().map(|s| s.to_string()).collect();
    prompt_index(prompt, &labels, Some(0), header, None)
}

/// Numbered list; the first key decides between arrow navigation and typed input.
pub fn prompt_index(
    prompt: &str,
    labels: &[String],
    default: Option<usize>,
    header: Option<&str>,
    header_indices: Option<&[usize]>,
) -> Result<MenuChoice> {
    let term = Term::stdout();
    let _ = start_screen(&term, prompt, header);
    for (i, it) in labels.iter().enumerate() {
        println!("{}: {}", i + 1, emphasise(it, i, header_indices));
    }
    println!("Type a number + Enter, or use arrow keys + Enter. 'b' = back, 'q' = quit. Tab = next section");

    match term.read_key()? {
        Key::ArrowUp | Key::ArrowDown | Key::Home | Key::End | Key::PageUp | Key::PageDown | Key::Tab => {
            arrow_select(prompt, labels, default, header, header_indices)
        }
        Key::Char('q') | Key::Char('Q') => Ok(MenuChoice::Quit),
        Key::Char('b') | Key::Char('B') | Key::Escape => Ok(MenuChoice::Back),
        Key::Enter => match default {
            Some(d) => Ok(MenuChoice::Index(d)),
            None => read_selection(|| selection_input(None), labels.len(), default),
        },
        Key::Char(c) if !c.is_control() => {
            // Fall back to text input initialized with the first typed char
            let mut initial = Some(c.to_string());
            read_selection(|| selection_input(initial.take()), labels.len(), default)
        }
        _ => read_selection(|| selection_input(None), labels.len(), default),
    }
}

fn selection_input(initial: Option<String>) -> Result<String> {
    let mut builder = Input::new().with_prompt("Selection").allow_empty(true);
    if let Some(text) = initial {
        builder = builder.with_initial_text(text);
    }
    Ok(builder.interact_text()?)
}

/// Asks again until the typed input names an entry, `b` or `q`.
fn read_selection(
    mut read: impl FnMut() -> Result<String>,
    len: usize,
    default: Option<usize>,
) -> Result<MenuChoice> {
    loop {
        match parse_selection(&read()?, len, default) {
            Ok(choice) => return Ok(choice),
            Err(err) => println!("{}: enter 1-{}, 'b' or 'q'", err, len),
        }
    }
}

fn start_screen(term: &Term, prompt: &str, header: Option<&str>) -> std::io::Result<()> {
    term.clear_screen()?;
    if let Some(h) = header {
        println!("{}", h);
    }
    println!("{}", style(prompt).bold());
    Ok(())
}

/// Section headings stand out from the story links around them.
fn emphasise(label: &str, i: usize, headings: Option<&[usize]>) -> String {
    if headings.is_some_and(|h| h.contains(&i)) {
        style(label).cyan().bold().to_string()
    } else {
        label.to_string()
    }
}

/// Free-text prompt; `None` when left empty.
pub fn prompt_text(prompt: &str) -> Result<Option<String>> {
    let s: String = Input::new()
        .with_prompt(prompt)
        .allow_empty(true)
        .interact_text()?;
    let s = s.trim();
    Ok((!s.is_empty()).then(|| s.to_string()))
}

fn parse_selection(input: &str, len: usize, default: Option<usize>) -> Result<MenuChoice> {
    let s = input.trim();
    if s.is_empty() {
        return default
            .map(MenuChoice::Index)
            .ok_or_else(|| anyhow!("no selection"));
    }
    if s.eq_ignore_ascii_case("q") {
        return Ok(MenuChoice::Quit);
    }
    if s.eq_ignore_ascii_case("b") {
        return Ok(MenuChoice::Back);
    }
    let idx: usize = s.parse::<usize>().map_err(|_| anyhow!("invalid selection"))?;
    if idx == 0 || idx > len {
        return Err(anyhow!("out of range"));
    }
    Ok(MenuChoice::Index(idx - 1))
}

/// First heading strictly after `sel`, wrapping to the first one.
fn next_heading(sel: usize, headings: &[usize]) -> Option<usize> {
    headings
        .iter()
        .copied()
        .find(|&h| h > sel)
        .or_else(|| headings.first().copied())
}

fn arrow_select(
    prompt: &str,
    items: &[String],
    default: Option<usize>,
    header: Option<&str>,
    header_indices: Option<&[usize]>,
) -> Result<MenuChoice> {
    let term = Term::stdout();
    let mut sel = default.unwrap_or(0).min(items.len().saturating_sub(1));
    let mut top: usize = 0;
    loop {
        start_screen(&term, prompt, header)?;

        let (rows_u16, _cols_u16) = term.size();
        let rows: usize = rows_u16 as usize;
        let reserved: usize = 2 + usize::from(header.is_some()); // header + prompt + help
        let max_visible = rows.saturating_sub(reserved).max(3).min(items.len());

        // keep selection in viewport
        if sel < top {
            top = sel;
        }
        if sel >= top + max_visible {
            top = sel + 1 - max_visible;
        }

        let end = (top + max_visible).min(items.len());
        for (i, item) in items.iter().enumerate().take(end).skip(top) {
            let marker = if i == sel { ">" } else { " " };
            println!("{} {}: {}", marker, i + 1, emphasise(item, i, header_indices));
        }
        println!("Use arrows + Enter. 'b' = back, 'q' = quit. Tab = next section");

        let step: usize = max_visible.saturating_sub(1).max(1);
        match term.read_key()? {
            Key::ArrowUp => sel = sel.saturating_sub(1),
            Key::ArrowDown => {
                if sel + 1 < items.len() {
                    sel += 1;
                }
            }
            Key::Home => sel = 0,
            Key::End => sel = items.len().saturating_sub(1),
            Key::PageUp => sel = sel.saturating_sub(step),
            Key::PageDown => sel = (sel + step).min(items.len().saturating_sub(1)),
            Key::Tab => {
                if let Some(next) = header_indices.and_then(|h| next_heading(sel, h)) {
                    sel = next.min(items.len().saturating_sub(1));
                }
            }
            Key::Enter => return Ok(MenuChoice::Index(sel)),
            Key::Char('q') | Key::Char('Q') => return Ok(MenuChoice::Quit),
            Key::Char('b') | Key::Char('B') | Key::Escape => return Ok(MenuChoice::Back),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_typed_selection() {
        assert!(matches!(parse_selection("2", 3, None), Ok(MenuChoice::Index(1))));
        assert!(matches!(parse_selection(" ", 3, Some(0)), Ok(MenuChoice::Index(0))));
        assert!(matches!(parse_selection("Q", 3, None), Ok(MenuChoice::Quit)));
        assert!(matches!(parse_selection("b", 3, None), Ok(MenuChoice::Back)));
        assert!(parse_selection("4", 3, None).is_err());
        assert!(parse_selection("0", 3, None).is_err());
        assert!(parse_selection("x", 3, None).is_err());
    }

    #[test]
    fn typos_are_asked_again() {
        let mut inputs = ["99", "x", "", "2"].into_iter();
        let choice = read_selection(|| Ok(inputs.next().unwrap().to_string()), 3, None).unwrap();
        assert!(matches!(choice, MenuChoice::Index(1)));
        assert_eq!(inputs.next(), None);
    }

    #[test]
    fn input_failure_still_propagates() {
        let res = read_selection(|| Err(anyhow!("terminal closed")), 3, Some(0));
        assert!(res.is_err());
    }

    #[test]
    fn tab_wraps_to_first_heading() {
        let headings = [0, 5, 9];
        assert_eq!(next_heading(0, &headings), Some(5));
        assert_eq!(next_heading(7, &headings), Some(9));
        assert_eq!(next_heading(9, &headings), Some(0));
        assert_eq!(next_heading(3, &[]), None);
    }

    #[test]
    fn only_headings_are_emphasised() {
        assert_eq!(emphasise("  - Budget", 1, Some(&[0, 4])), "  - Budget");
        assert_eq!(emphasise("  - Budget", 1, None), "  - Budget");
        assert!(emphasise("== TOP ==", 0, Some(&[0, 4])).contains("== TOP =="));
    }
}
