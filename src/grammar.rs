use crate::error::RollError;
use crate::knowledge::KnowledgeBase;
use crate::types::expr::*;
use std::cell::Cell;
use std::cmp::Reverse;
use winnow::Parser;
use winnow::Result as WNResultBase;
use winnow::ascii::{Caseless, digit1};
use winnow::combinator::{alt, fail, opt};
use winnow::error::{ContextError, ErrMode};
use winnow::stream::Stream;
use winnow::token::{literal, take_while};

pub type WNResult<O, E = ContextError> = WNResultBase<O, ErrMode<E>>;

/// Deepest nesting of parentheses and `d` prefixes a spec may use.
pub const MAX_NESTING: usize = 100;

/// Most values and dice suffixes a single spec may hold.
pub const MAX_TERMS: usize = 1_000;

// Grammar, lowest precedence first:
//
//   sum      := sum ('+'|'plus'|'-'|'minus') mul | mul
//   mul      := mul ('*'|'times'|'multiplied by'|'multiplied with') value | value
//   value    := dice | critical | advantage | '(' sum ')' | INT | damage
//   dice     := die | value die
//   die      := 'd' value | value 'sided' ('dice'|'die') | NAMED_DIE
//   critical := 'critical' 'to'? 'hit'? 'with'? 'a'? damage
//   damage   := WEAPON | spell
//   spell    := SPELL ['at' 'level' INT | 'at'? INT ORDINAL 'level']
//             | 'level' INT SPELL | INT ORDINAL 'level' SPELL
//
// Spaces and commas separate tokens. Names and keywords ignore case.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DamageKind {
    Weapon,
    Spell,
}

/// A dice-spec parser whose name alternatives come from a [`KnowledgeBase`].
///
/// Built once; changing the knowledge base means building a new grammar.
#[derive(Debug, Clone)]
pub struct Grammar {
    named_dice: Vec<String>,
    spells: Vec<String>,
    // Weapons and spells together, so the longest name wins across both
    damage: Vec<(String, DamageKind)>,
}

impl Grammar {
    pub fn new(knowledge: &KnowledgeBase) -> Self {
        let mut named_dice = usable_names(knowledge.named_dice().iter().map(|d| &d.name));
        let mut spells = usable_names(knowledge.spells().iter().map(|s| &s.name));
        let mut damage: Vec<(String, DamageKind)> =
            usable_names(knowledge.weapons().iter().map(|w| &w.name))
                .into_iter()
                .map(|name| (name, DamageKind::Weapon))
                .chain(spells.iter().map(|name| (name.clone(), DamageKind::Spell)))
                .collect();

        named_dice.sort_by_key(|name| Reverse(name.len()));
        spells.sort_by_key(|name| Reverse(name.len()));
        damage.sort_by_key(|(name, _)| Reverse(name.len()));

        Grammar {
            named_dice,
            spells,
            damage,
        }
    }

    /// Parses a whole dice spec as typed by a user.
    pub fn parse(&self, text: &str) -> Result<Expr, RollError> {
        self.parse_sum(text, || {
            RollError::recognition("Sorry, I couldn't understand your request")
        })
    }

    /// Parses dice text taken from a weapon or spell record.
    pub fn parse_subexpression(&self, text: &str) -> Result<Expr, RollError> {
        self.parse_sum(text, || {
            RollError::recognition(format!("Sorry, I couldn't understand the dice `{}`", text))
        })
    }

    fn parse_sum(
        &self,
        text: &str,
        not_understood: impl FnOnce() -> RollError,
    ) -> Result<Expr, RollError> {
        let parser = SpecParser::new(self);
        match (|input: &mut &str| parser.full(input)).parse(text) {
            Ok(expr) => Ok(expr),
            Err(_) if parser.too_large.get() => {
                tracing::debug!(text, "spec exceeds the nesting or term limit");
                Err(RollError::recognition(
                    "Sorry, that request is too long or nested too deeply",
                ))
            }
            Err(e) => {
                tracing::debug!(text, error = %e, "spec does not match the grammar");
                Err(not_understood())
            }
        }
    }
}

/// Per-call parser state. Counts nesting and terms so a hostile spec is
/// rejected before the tree gets deep enough to exhaust the stack.
struct SpecParser<'g> {
    grammar: &'g Grammar,
    depth: Cell<usize>,
    terms: Cell<usize>,
    too_large: Cell<bool>,
}

impl<'g> SpecParser<'g> {
    fn new(grammar: &'g Grammar) -> Self {
        SpecParser {
            grammar,
            depth: Cell::new(0),
            terms: Cell::new(0),
            too_large: Cell::new(false),
        }
    }

    fn full(&self, input: &mut &str) -> WNResult<Expr> {
        let expr = self.sum(input)?;
        separator(input)?; // trailing blanks
        Ok(expr)
    }

    // ==========================================
    // Limits
    // ==========================================

    fn reject(&self) -> ErrMode<ContextError> {
        self.too_large.set(true);
        ErrMode::Cut(ContextError::new())
    }

    /// Runs `parse` one nesting level deeper.
    fn nested<O>(&self, parse: impl FnOnce() -> WNResult<O>) -> WNResult<O> {
        let depth = self.depth.get() + 1;
        if depth > MAX_NESTING {
            return Err(self.reject());
        }
        self.depth.set(depth);
        let result = parse();
        self.depth.set(depth - 1);
        result
    }

    fn count_term(&self) -> WNResult<()> {
        let terms = self.terms.get() + 1;
        if terms > MAX_TERMS {
            return Err(self.reject());
        }
        self.terms.set(terms);
        Ok(())
    }

    // ==========================================
    // Arithmetic
    // ==========================================

    fn sum(&self, input: &mut &str) -> WNResult<Expr> {
        let mut left = self.mul(input)?;
        while let Some(op) = opt(additive_op).parse_next(input)? {
            let right = self.mul(input)?;
            left = Expr::binary(left, op, right);
        }
        Ok(left)
    }

    fn mul(&self, input: &mut &str) -> WNResult<Expr> {
        let mut left = self.value(input)?;
        while opt(multiplicative_op).parse_next(input)?.is_some() {
            let right = self.value(input)?;
            left = Expr::binary(left, BinOp::Mul, right);
        }
        Ok(left)
    }

    // ==========================================
    // Values and dice
    // ==========================================

    // `dice := value die` is left recursive, so dice suffixes are folded in a loop
    fn value(&self, input: &mut &str) -> WNResult<Expr> {
        self.count_term()?;
        let mut value = self.value_head(input)?;
        loop {
            if let Some(sides) = opt(|i: &mut &str| self.die(i)).parse_next(input)? {
                self.count_term()?;
                value = Expr::roll_n(value, sides);
            } else if value.is_dice()
                && opt(phrase(&["with", "advantage"])).parse_next(input)?.is_some()
            {
                value = Expr::advantage(value);
            } else if value.is_dice()
                && opt(phrase(&["with", "disadvantage"])).parse_next(input)?.is_some()
            {
                value = Expr::disadvantage(value);
            } else {
                break;
            }
        }
        Ok(value)
    }

    // A lone die (`d20`, `coin`, `6 sided die`) or a primary value
    fn value_head(&self, input: &mut &str) -> WNResult<Expr> {
        if let Some(sides) = opt(|i: &mut &str| self.named_die(i)).parse_next(input)? {
            return Ok(Expr::roll_one(sides));
        }
        // Names are tried before the `d` prefix so "dagger" never reads as d(agger)
        if let Some(primary) = opt(|i: &mut &str| self.primary(i)).parse_next(input)? {
            return match opt(sided_die).parse_next(input)? {
                Some(()) => Ok(Expr::roll_one(primary)),
                None => Ok(primary),
            };
        }
        die_prefix(input)?;
        let sides = self.die_sides(input)?;
        Ok(Expr::roll_one(sides))
    }

    /// Parses a die and returns its side count.
    fn die(&self, input: &mut &str) -> WNResult<Expr> {
        alt((
            |i: &mut &str| self.named_die(i),
            |i: &mut &str| -> WNResult<Expr> {
                let sides = self.primary(i)?;
                sided_die(i)?;
                Ok(sides)
            },
            |i: &mut &str| -> WNResult<Expr> {
                die_prefix(i)?;
                self.die_sides(i)
            },
        ))
        .parse_next(input)
    }

    // What follows a `d`. Another lone die is rolled for the side count, so
    // "d coin" and "dd6" are a die with a random number of sides
    fn die_sides(&self, input: &mut &str) -> WNResult<Expr> {
        self.nested(|| {
            alt((
                |i: &mut &str| self.named_die(i).map(Expr::roll_one),
                |i: &mut &str| self.primary(i),
                |i: &mut &str| -> WNResult<Expr> {
                    die_prefix(i)?;
                    self.die_sides(i).map(Expr::roll_one)
                },
            ))
            .parse_next(input)
        })
    }

    fn primary(&self, input: &mut &str) -> WNResult<Expr> {
        alt((
            |i: &mut &str| self.parenthesised(i),
            |i: &mut &str| self.critical(i),
            |i: &mut &str| self.damage(i).map(Expr::value),
            |i: &mut &str| integer(i).map(Expr::int),
        ))
        .parse_next(input)
    }

    fn parenthesised(&self, input: &mut &str) -> WNResult<Expr> {
        symbol("(").parse_next(input)?;
        let inner = self.nested(|| self.sum(input))?;
        symbol(")").parse_next(input)?;
        Ok(Expr::value(inner))
    }

    fn named_die(&self, input: &mut &str) -> WNResult<Expr> {
        separator(input)?;
        match self.grammar.named_dice.iter().find_map(|name| take_word(input, name)) {
            Some(name) => Ok(Expr::named_die(name)),
            None => fail(input),
        }
    }

    // ==========================================
    // Critical hits, weapons and spells
    // ==========================================

    fn critical(&self, input: &mut &str) -> WNResult<Expr> {
        keyword("critical").parse_next(input)?;
        for filler in ["to", "hit", "with", "a"] {
            opt(keyword(filler)).parse_next(input)?;
        }
        let damage = self.damage(input)?;
        Ok(Expr::critical(damage))
    }

    fn damage(&self, input: &mut &str) -> WNResult<Expr> {
        alt((
            |i: &mut &str| self.reversed_spell(i),
            |i: &mut &str| self.named_damage(i),
        ))
        .parse_next(input)
    }

    fn named_damage(&self, input: &mut &str) -> WNResult<Expr> {
        separator(input)?;
        let found = self
            .grammar
            .damage
            .iter()
            .find_map(|(name, kind)| take_word(input, name).map(|matched| (matched, *kind)));
        match found {
            Some((name, DamageKind::Weapon)) => Ok(Expr::weapon(name)),
            Some((name, DamageKind::Spell)) => {
                let level = opt(spell_level_suffix).parse_next(input)?;
                Ok(Expr::spell(name, level.map(Expr::int)))
            }
            None => fail(input),
        }
    }

    // "level 5 fireball" and "5th level fireball" mean "fireball at level 5"
    fn reversed_spell(&self, input: &mut &str) -> WNResult<Expr> {
        let level = alt((
            |i: &mut &str| -> WNResult<i64> {
                keyword("level").parse_next(i)?;
                integer(i)
            },
            |i: &mut &str| -> WNResult<i64> {
                let level = integer(i)?;
                ordinal(i)?;
                keyword("level").parse_next(i)?;
                Ok(level)
            },
        ))
        .parse_next(input)?;
        separator(input)?;
        match self.grammar.spells.iter().find_map(|name| take_word(input, name)) {
            Some(name) => Ok(Expr::spell(name, Some(Expr::int(level)))),
            None => fail(input),
        }
    }
}

fn usable_names<'a>(names: impl Iterator<Item = &'a String>) -> Vec<String> {
    names
        .filter(|name| !name.trim().is_empty())
        .cloned()
        .collect()
}

// ==========================================
// Lexical helpers
// ==========================================

fn is_separator(c: char) -> bool {
    c.is_whitespace() || c == ','
}

fn separator(input: &mut &str) -> WNResult<()> {
    take_while(0.., is_separator).void().parse_next(input)
}

fn at_word_end(rest: &str) -> bool {
    !rest.chars().next().is_some_and(char::is_alphanumeric)
}

/// Consumes `word` if the input starts with it (ignoring case) and it is not
/// the prefix of a longer word.
fn take_word<'i>(input: &mut &'i str, word: &str) -> Option<&'i str> {
    let text: &'i str = *input;
    let head = text.get(..word.len())?;
    if head.eq_ignore_ascii_case(word) && at_word_end(&text[word.len()..]) {
        Some(input.next_slice(word.len()))
    } else {
        None
    }
}

fn keyword<'i>(word: &'static str) -> impl Parser<&'i str, &'i str, ErrMode<ContextError>> {
    move |input: &mut &'i str| -> WNResult<&'i str> {
        separator(input)?;
        match take_word(input, word) {
            Some(matched) => Ok(matched),
            None => fail(input),
        }
    }
}

fn phrase<'i>(words: &'static [&'static str]) -> impl Parser<&'i str, (), ErrMode<ContextError>> {
    move |input: &mut &'i str| -> WNResult<()> {
        for word in words {
            keyword(*word).parse_next(input)?;
        }
        Ok(())
    }
}

fn symbol<'i>(text: &'static str) -> impl Parser<&'i str, &'i str, ErrMode<ContextError>> {
    move |input: &mut &'i str| -> WNResult<&'i str> {
        separator(input)?;
        literal(text).parse_next(input)
    }
}

fn die_prefix(input: &mut &str) -> WNResult<()> {
    separator(input)?;
    literal(Caseless("d")).void().parse_next(input)
}

fn integer(input: &mut &str) -> WNResult<i64> {
    separator(input)?;
    digit1.try_map(str::parse::<i64>).parse_next(input)
}

fn ordinal(input: &mut &str) -> WNResult<()> {
    alt((
        keyword("st"),
        keyword("nd"),
        keyword("rd"),
        keyword("th"),
    ))
    .void()
    .parse_next(input)
}

fn sided_die(input: &mut &str) -> WNResult<()> {
    keyword("sided").parse_next(input)?;
    alt((keyword("dice"), keyword("die"))).void().parse_next(input)
}

fn spell_level_suffix(input: &mut &str) -> WNResult<i64> {
    alt((
        |i: &mut &str| -> WNResult<i64> {
            phrase(&["at", "level"]).parse_next(i)?;
            integer(i)
        },
        |i: &mut &str| -> WNResult<i64> {
            opt(keyword("at")).parse_next(i)?;
            let level = integer(i)?;
            ordinal(i)?;
            keyword("level").parse_next(i)?;
            Ok(level)
        },
    ))
    .parse_next(input)
}

// ==========================================
// Operators
// ==========================================

fn additive_op(input: &mut &str) -> WNResult<BinOp> {
    alt((
        symbol("+").map(|_| BinOp::Add),
        keyword("plus").map(|_| BinOp::Add),
        symbol("-").map(|_| BinOp::Sub),
        keyword("minus").map(|_| BinOp::Sub),
    ))
    .parse_next(input)
}

fn multiplicative_op(input: &mut &str) -> WNResult<()> {
    alt((
        symbol("*").void(),
        keyword("times").void(),
        phrase(&["multiplied", "by"]),
        phrase(&["multiplied", "with"]),
    ))
    .parse_next(input)
}
