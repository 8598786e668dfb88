//! Turns recipe source text into a [`Recipe`].
//!
//! The grammar is line- and paragraph-oriented: a title, a blank line, then
//! an unordered run of `Ingredients.`/`Cooking time:`/`Pre-heat oven to...`
//! paragraphs (and at most one free-text comment paragraph interleaved among
//! them), terminated by a `Method.` paragraph, an optional `Serves N.` line,
//! and nothing else but blank lines to end of input.

use regex::Regex;

use crate::container::IngredientList;
use crate::error::{SyntaxError, SyntaxErrorKind};
use crate::model::{
    ContainerId, CookingTime, Flavor, Ingredient, IngredientProps, Instruction, Op,
    OvenTemperature, Recipe, TimeUnit,
};
use crate::text;
use crate::validators;

/// Utility to create a lazily compiled regex, keyed by call site.
/// From <https://docs.rs/once_cell/latest/once_cell/#lazily-compiled-regex>
macro_rules! regex {
    ($re:literal $(,)?) => {{
        static RE: once_cell::sync::OnceCell<Regex> = once_cell::sync::OnceCell::new();
        RE.get_or_init(|| {
            let _enter = tracing::trace_span!("regex", re = $re).entered();
            Regex::new($re).expect("invalid regex literal")
        })
    }};
}

/// Parses a complete recipe from source text.
#[tracing::instrument(skip_all)]
pub fn parse(source: &str) -> Result<Recipe, SyntaxError> {
    let lines: Vec<&str> = source.lines().collect();

    let title = lines.first().copied().unwrap_or("");
    validators::validate_title(title)?;

    match lines.get(1) {
        Some(line) if line.is_empty() => {}
        _ => return Err(SyntaxError::new(SyntaxErrorKind::MissingBlankLine, Some(2))),
    }

    let mut pos = 2;
    let mut ingredients = IngredientList::new();
    let mut cooking_time = None;
    let mut oven_temperature = None;
    // The grammar allows at most one free-text comment paragraph before
    // `Method.`; a second unrecognized paragraph means the method section
    // was never found.
    let mut consumed_comment = false;

    loop {
        if pos >= lines.len() {
            return Err(SyntaxError::new(SyntaxErrorKind::MissingMethod, None));
        }
        let header_lineno = (pos + 1) as u32;
        let (paragraph, next) = text::read_paragraph(&lines, pos);
        let first_line = paragraph.lines().next().unwrap_or("");

        if first_line == "Ingredients." {
            ingredients = parse_ingredient_list(&paragraph, header_lineno)?;
        } else if let Some((amount, unit)) = match_cooking_time(first_line) {
            validators::validate_cooking_time(amount, unit, Some(header_lineno))?;
            cooking_time = Some(CookingTime {
                amount,
                unit: parse_time_unit(unit),
            });
        } else if let Some((celsius, gas_mark)) = match_oven_temperature(first_line) {
            oven_temperature = Some(OvenTemperature { celsius, gas_mark });
        } else if first_line == "Method." {
            let instructions = parse_method(&paragraph, header_lineno)?;
            let (serves, after_serves) = parse_serves_if_present(&lines, next);
            check_no_trailing_content(&lines, after_serves)?;
            return Ok(Recipe {
                title: title.to_string(),
                ingredients,
                cooking_time,
                oven_temperature,
                instructions,
                serves,
            });
        } else if consumed_comment {
            return Err(SyntaxError::new(SyntaxErrorKind::MissingMethod, Some(header_lineno)));
        } else {
            // A single free-text comment paragraph; Chef lets authors
            // annotate recipes between declarations, but only once.
            consumed_comment = true;
        }
        pos = next;
    }
}

/// Verifies that every remaining line, up to end-of-input, is blank.
///
/// The parser always consumes exactly one paragraph after `Method.` as its
/// attempt at a `Serves` line, whether or not it matches; anything left over
/// after that is unexpected trailing content.
fn check_no_trailing_content(lines: &[&str], start: usize) -> Result<(), SyntaxError> {
    for (offset, line) in lines[start..].iter().enumerate() {
        if !line.is_empty() {
            return Err(SyntaxError::new(
                SyntaxErrorKind::TrailingContent,
                Some((start + offset + 1) as u32),
            ));
        }
    }
    Ok(())
}

fn parse_time_unit(unit: &str) -> TimeUnit {
    if unit.starts_with("hour") {
        TimeUnit::Hour
    } else {
        TimeUnit::Minute
    }
}

fn match_cooking_time(line: &str) -> Option<(u32, &str)> {
    let caps = regex!(r"^Cooking time: (\d+) (hours?|minutes?)\.$").captures(line)?;
    let amount: u32 = caps.get(1)?.as_str().parse().ok()?;
    let unit = caps.get(2)?.as_str();
    Some((amount, unit))
}

fn match_oven_temperature(line: &str) -> Option<(u32, Option<u32>)> {
    let caps = regex!(r"^Pre-heat oven to (\d+) degrees Celsius(?: \(gas mark (\d+)\))?\.$")
        .captures(line)?;
    let celsius: u32 = caps.get(1)?.as_str().parse().ok()?;
    let gas_mark = caps.get(2).and_then(|m| m.as_str().parse().ok());
    Some((celsius, gas_mark))
}

fn parse_serves_if_present(lines: &[&str], start: usize) -> (Option<u32>, usize) {
    let (paragraph, next) = text::read_paragraph(lines, start);
    let line = paragraph.lines().next().unwrap_or("");
    let serves = regex!(r"^Serves ([1-9]\d*)\.$")
        .captures(line)
        .and_then(|caps| caps.get(1)?.as_str().parse().ok());
    (serves, next)
}

fn parse_ordinal_identifier(text: &str, lineno: Option<u32>) -> Result<ContainerId, SyntaxError> {
    let caps = regex!(r"^([1-9]\d*)(st|nd|rd|th)$").captures(text).ok_or_else(|| {
        SyntaxError::new(
            SyntaxErrorKind::OrdinalIdentifier {
                text: text.to_string(),
            },
            lineno,
        )
    })?;
    let number: u32 = caps[1].parse().expect("digits already matched by regex");
    let suffix = &caps[2];
    validators::validate_ordinal_id_suffix(number, suffix, lineno)?;
    Ok(number)
}

fn get_ordinal_id(
    text: Option<&str>,
    lineno: Option<u32>,
) -> Result<Option<ContainerId>, SyntaxError> {
    text.map(|t| parse_ordinal_identifier(t, lineno)).transpose()
}

fn invalid_command(command: &str, lineno: Option<u32>) -> SyntaxError {
    SyntaxError::new(
        SyntaxErrorKind::InvalidCommand {
            command: command.to_string(),
        },
        lineno,
    )
}

fn detect_flavor(
    measure: Option<&str>,
    measure_type: Option<&str>,
    lineno: Option<u32>,
) -> Result<Flavor, SyntaxError> {
    let Some(measure) = measure else {
        return Ok(Flavor::Unknown);
    };
    if let Some(measure_type) = measure_type {
        validators::validate_measure_type(measure, measure_type, lineno)?;
        return Ok(Flavor::Dry);
    }
    if regex!(r"^(?:kg|g|pinches|pinch)$").is_match(measure) {
        return Ok(Flavor::Dry);
    }
    if regex!(r"^(?:ml|l|dashes|dash)$").is_match(measure) {
        return Ok(Flavor::Liquid);
    }
    // cups(s), teaspoon(s), tablespoon(s): could be dry or liquid.
    Ok(Flavor::Unknown)
}

fn parse_ingredient_item(item: &str, lineno: Option<u32>) -> Result<Ingredient, SyntaxError> {
    let caps = regex!(
        r"^(?:(\d+) )?(?:(?:(heaped|level) )?(kg|g|pinches|pinch|ml|l|dashes|dash|cups|cup|teaspoons|teaspoon|tablespoons|tablespoon) )?(.+)$"
    )
    .captures(item)
    .ok_or_else(|| {
        SyntaxError::new(
            SyntaxErrorKind::InvalidCommand {
                command: "ingredient".to_string(),
            },
            lineno,
        )
    })?;
    let value = caps.get(1).and_then(|m| m.as_str().parse::<i64>().ok());
    let measure_type = caps.get(2).map(|m| m.as_str());
    let measure = caps.get(3).map(|m| m.as_str());
    let name = caps[4].to_string();
    let flavor = detect_flavor(measure, measure_type, lineno)?;
    Ok(Ingredient::new(name, IngredientProps::new(value, flavor)))
}

fn parse_ingredient_list(
    paragraph: &str,
    header_lineno: u32,
) -> Result<IngredientList, SyntaxError> {
    let mut list = IngredientList::new();
    let mut lineno = header_lineno;
    let rest = paragraph.split_once('\n').map(|(_, r)| r).unwrap_or("");
    for item in rest.lines() {
        lineno += 1;
        if item.is_empty() {
            continue;
        }
        let ingredient = parse_ingredient_item(item, Some(lineno))?;
        list.assign(ingredient.name, ingredient.props);
    }
    Ok(list)
}

/// Returns the cached regex for one of the fixed prepositions a
/// `ingredient preposition [ordinal ]mixing bowl.` statement can use.
///
/// The ordinal group is written out in full in each arm since `regex!`'s
/// cached statics are keyed by call site and need a literal to interpolate.
fn ingredient_with_bowl_regex(preposition: &str) -> &'static Regex {
    match preposition {
        "into" => regex!(r"^(.+) into (?:([1-9]\d*(?:st|nd|rd|th)) )?mixing bowl\.$"),
        other => unreachable!("unhandled preposition: {other}"),
    }
}

/// `ingredient preposition [ordinal ]mixing bowl.`
fn parse_ingredient_with_bowl(
    cmd: &str,
    preposition: &str,
    statement: &str,
    lineno: Option<u32>,
) -> Result<(String, Option<ContainerId>), SyntaxError> {
    let caps = ingredient_with_bowl_regex(preposition)
        .captures(statement)
        .ok_or_else(|| invalid_command(cmd, lineno))?;
    let name = caps[1].to_string();
    let bowl = get_ordinal_id(caps.get(2).map(|m| m.as_str()), lineno)?;
    Ok((name, bowl))
}

/// Returns the cached regex for one of the fixed prepositions a
/// `ingredient[ preposition [ordinal ]mixing bowl].` statement can use.
fn ingredient_optional_bowl_regex(preposition: &str) -> &'static Regex {
    match preposition {
        "to" => regex!(r"^(.+?)(?: to (?:([1-9]\d*(?:st|nd|rd|th)) )?mixing bowl)\.$"),
        "from" => regex!(r"^(.+?)(?: from (?:([1-9]\d*(?:st|nd|rd|th)) )?mixing bowl)\.$"),
        "into" => regex!(r"^(.+?)(?: into (?:([1-9]\d*(?:st|nd|rd|th)) )?mixing bowl)\.$"),
        other => unreachable!("unhandled preposition: {other}"),
    }
}

/// `ingredient[ preposition [ordinal ]mixing bowl].`
fn parse_ingredient_optional_bowl(
    cmd: &str,
    preposition: &str,
    statement: &str,
    lineno: Option<u32>,
) -> Result<(String, Option<ContainerId>), SyntaxError> {
    if let Some(caps) = ingredient_optional_bowl_regex(preposition).captures(statement) {
        let name = caps[1].to_string();
        let bowl = get_ordinal_id(caps.get(2).map(|m| m.as_str()), lineno)?;
        return Ok((name, bowl));
    }
    let caps = regex!(r"^(.+)\.$")
        .captures(statement)
        .ok_or_else(|| invalid_command(cmd, lineno))?;
    Ok((caps[1].to_string(), None))
}

fn parse_add(statement: &str, lineno: Option<u32>) -> Result<Op, SyntaxError> {
    if statement.starts_with("dry ingredients") {
        return parse_add_dry(statement, lineno);
    }
    let (name, bowl) = parse_ingredient_optional_bowl("Add", "to", statement, lineno)?;
    Ok(Op::Add { name, bowl })
}

fn parse_add_dry(statement: &str, lineno: Option<u32>) -> Result<Op, SyntaxError> {
    let caps = regex!(r"^dry ingredients(?: to ([1-9]\d*(?:st|nd|rd|th)) mixing bowl)?\.$")
        .captures(statement)
        .ok_or_else(|| invalid_command("Add dry", lineno))?;
    let bowl = get_ordinal_id(caps.get(1).map(|m| m.as_str()), lineno)?;
    Ok(Op::AddDry { bowl })
}

fn parse_liquefy(statement: &str, lineno: Option<u32>) -> Result<Op, SyntaxError> {
    if let Some(caps) =
        regex!(r"^contents of the(?: ([1-9]\d*(?:st|nd|rd|th)))? mixing bowl\.$").captures(statement)
    {
        let bowl = get_ordinal_id(caps.get(1).map(|m| m.as_str()), lineno)?;
        return Ok(Op::LiquefyContents { bowl });
    }
    let caps = regex!(r"^(.+)\.$")
        .captures(statement)
        .ok_or_else(|| invalid_command("Liquefy", lineno))?;
    Ok(Op::LiquefyIngredient {
        name: caps[1].to_string(),
    })
}

fn parse_stir(statement: &str, lineno: Option<u32>) -> Result<Op, SyntaxError> {
    match statement.split(' ').next() {
        Some("the") | Some("for") => parse_stir_minutes(statement, lineno),
        _ => parse_stir_ingredient(statement, lineno),
    }
}

fn parse_stir_minutes(statement: &str, lineno: Option<u32>) -> Result<Op, SyntaxError> {
    let caps = regex!(r"^(?:the(?: ([1-9]\d*(?:st|nd|rd|th)))? mixing bowl )?for (\d+) minutes\.$")
        .captures(statement)
        .ok_or_else(|| invalid_command("Stir", lineno))?;
    let bowl = get_ordinal_id(caps.get(1).map(|m| m.as_str()), lineno)?;
    let minutes: u32 = caps[2].parse().expect("digits already matched by regex");
    Ok(Op::StirMinutes { bowl, minutes })
}

fn parse_stir_ingredient(statement: &str, lineno: Option<u32>) -> Result<Op, SyntaxError> {
    let caps = regex!(r"^(.+) into the(?: ([1-9]\d*(?:st|nd|rd|th)))? mixing bowl\.$")
        .captures(statement)
        .ok_or_else(|| invalid_command("Stir", lineno))?;
    let name = caps[1].to_string();
    let bowl = get_ordinal_id(caps.get(2).map(|m| m.as_str()), lineno)?;
    Ok(Op::StirIngredient { name, bowl })
}

fn parse_mix(statement: &str, lineno: Option<u32>) -> Result<Op, SyntaxError> {
    let caps = regex!(r"^(?:the(?: ([1-9]\d*(?:st|nd|rd|th)))? mixing bowl )?well\.$")
        .captures(statement)
        .ok_or_else(|| invalid_command("Mix", lineno))?;
    let bowl = get_ordinal_id(caps.get(1).map(|m| m.as_str()), lineno)?;
    Ok(Op::Mix { bowl })
}

fn parse_clean(statement: &str, lineno: Option<u32>) -> Result<Op, SyntaxError> {
    let caps = regex!(r"^(?:([1-9]\d*(?:st|nd|rd|th)) )?mixing bowl\.$")
        .captures(statement)
        .ok_or_else(|| invalid_command("Clean", lineno))?;
    let bowl = get_ordinal_id(caps.get(1).map(|m| m.as_str()), lineno)?;
    Ok(Op::Clean { bowl })
}

fn parse_pour(statement: &str, lineno: Option<u32>) -> Result<Op, SyntaxError> {
    let caps = regex!(
        r"^contents of the(?: ([1-9]\d*(?:st|nd|rd|th)))? mixing bowl into the(?: ([1-9]\d*(?:st|nd|rd|th)))? baking dish\.$"
    )
    .captures(statement)
    .ok_or_else(|| invalid_command("Pour", lineno))?;
    let bowl = get_ordinal_id(caps.get(1).map(|m| m.as_str()), lineno)?;
    let dish = get_ordinal_id(caps.get(2).map(|m| m.as_str()), lineno)?;
    Ok(Op::Pour { bowl, dish })
}

fn parse_refrigerate(statement: &str, lineno: Option<u32>) -> Result<Op, SyntaxError> {
    let caps = regex!(r"^(?:for ([1-9]\d*) (hours?))?\.$")
        .captures(statement)
        .ok_or_else(|| invalid_command("Refrigerate", lineno))?;
    let hours: Option<u32> = caps.get(1).and_then(|m| m.as_str().parse().ok());
    let unit = caps.get(2).map(|m| m.as_str()).unwrap_or("hours");
    validators::validate_time_declaration(hours, unit, lineno)?;
    Ok(Op::Refrigerate { hours })
}

fn parse_loop(verb: &str, statement: &str, lineno: Option<u32>) -> Result<Op, SyntaxError> {
    if let Some(caps) = regex!(r"^(?:the (.+) )?until ([a-z]+ed)\.$").captures(statement) {
        return Ok(Op::LoopEnd {
            participle: caps[2].to_string(),
            name: caps.get(1).map(|m| m.as_str().to_string()),
        });
    }
    let caps = regex!(r"^the (.+)\.$")
        .captures(statement)
        .ok_or_else(|| invalid_command(verb, lineno))?;
    Ok(Op::LoopStart {
        verb: verb.to_string(),
        name: caps[1].to_string(),
    })
}

fn parse_instruction(line: &str, lineno: u32) -> Result<Op, SyntaxError> {
    let ln = Some(lineno);
    let (method, statement) = line
        .split_once(' ')
        .ok_or_else(|| invalid_command(line, ln))?;
    match method {
        "Take" => {
            let caps = regex!(r"^(.+) from refrigerator\.$")
                .captures(statement)
                .ok_or_else(|| invalid_command("Take", ln))?;
            Ok(Op::Take {
                name: caps[1].to_string(),
            })
        }
        "Put" => {
            let (name, bowl) = parse_ingredient_with_bowl("Put", "into", statement, ln)?;
            Ok(Op::Put { name, bowl })
        }
        "Fold" => {
            let (name, bowl) = parse_ingredient_with_bowl("Fold", "into", statement, ln)?;
            Ok(Op::Fold { name, bowl })
        }
        "Add" => parse_add(statement, ln),
        "Remove" => {
            let (name, bowl) = parse_ingredient_optional_bowl("Remove", "from", statement, ln)?;
            Ok(Op::Remove { name, bowl })
        }
        "Combine" => {
            let (name, bowl) = parse_ingredient_optional_bowl("Combine", "into", statement, ln)?;
            Ok(Op::Combine { name, bowl })
        }
        "Divide" => {
            let (name, bowl) = parse_ingredient_optional_bowl("Divide", "into", statement, ln)?;
            Ok(Op::Divide { name, bowl })
        }
        "Liquefy" => parse_liquefy(statement, ln),
        "Stir" => parse_stir(statement, ln),
        "Mix" => parse_mix(statement, ln),
        "Clean" => parse_clean(statement, ln),
        "Pour" => parse_pour(statement, ln),
        "Refrigerate" => parse_refrigerate(statement, ln),
        verb => parse_loop(verb, statement, ln),
    }
}

fn parse_method(paragraph: &str, header_lineno: u32) -> Result<Vec<Instruction>, SyntaxError> {
    let body = paragraph.strip_prefix("Method.\n").unwrap_or("");
    let trimmed = body.trim_end_matches('.');
    let mut instructions = Vec::new();
    let mut lineno = header_lineno;
    for clause in trimmed.split('.') {
        lineno += 1;
        let clause = clause.trim();
        if clause.is_empty() {
            continue;
        }
        let line = format!("{clause}.");
        let op = parse_instruction(&line, lineno)?;
        instructions.push(Instruction::new(lineno, op));
    }
    Ok(instructions)
}
