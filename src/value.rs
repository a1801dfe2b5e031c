// (C) 2020 Brandon Lewis
//
// The runtime value model (spec §3, §4.1).
//
// Mirrors the teacher's vm.rs `Value`/`TypeTag` pair (a closed sum type with
// an enumflags2-backed type tag for building "expected one-of, got X" error
// messages) but with variants chosen to match Forge's value model instead of
// the teacher's graphics-VM one, and with `Rc<RefCell<_>>` on the mutable
// container variants so that a list (for example) pushed into a variable and
// later mutated through `list_append` stays the same heap object — see
// SPEC_FULL.md §3 for why this, rather than value-copy, is the resolution.

use enumflags2::BitFlags;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

#[derive(BitFlags, Copy, Clone, Debug, PartialEq, Eq)]
#[repr(u16)]
pub enum TypeTag {
    Int = 1 << 0,
    Float = 1 << 1,
    Bool = 1 << 2,
    None = 1 << 3,
    Str = 1 << 4,
    Complex = 1 << 5,
    List = 1 << 6,
    Tuple = 1 << 7,
    Set = 1 << 8,
    FrozenSet = 1 << 9,
    Dict = 1 << 10,
    Bytes = 1 << 11,
    ByteArray = 1 << 12,
    MemoryView = 1 << 13,
    Range = 1 << 14,
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            TypeTag::Int => "int",
            TypeTag::Float => "float",
            TypeTag::Bool => "bool",
            TypeTag::None => "none",
            TypeTag::Str => "str",
            TypeTag::Complex => "complex",
            TypeTag::List => "list",
            TypeTag::Tuple => "tuple",
            TypeTag::Set => "set",
            TypeTag::FrozenSet => "frozenset",
            TypeTag::Dict => "dict",
            TypeTag::Bytes => "bytes",
            TypeTag::ByteArray => "bytearray",
            TypeTag::MemoryView => "memoryview",
            TypeTag::Range => "range",
        };
        write!(f, "{}", name)
    }
}

pub type List = Rc<RefCell<Vec<Value>>>;
pub type Dict = Rc<RefCell<Vec<(Value, Value)>>>;
pub type SetVal = Rc<RefCell<Vec<Value>>>;

#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Int(i64),
    Float(f64),
    Bool(bool),
    None,
    Str(Rc<String>),
    Complex(f64, f64),
    List(List),
    Tuple(Rc<Vec<Value>>),
    Set(SetVal),
    FrozenSet(Rc<Vec<Value>>),
    Dict(Dict),
    Bytes(Rc<Vec<u8>>),
    ByteArray(Rc<RefCell<Vec<u8>>>),
    MemoryView(Rc<RefCell<Vec<u8>>>),
    Range(i64, i64, i64),
}

impl Value {
    pub fn str(s: impl Into<String>) -> Value {
        Value::Str(Rc::new(s.into()))
    }

    pub fn list(items: Vec<Value>) -> Value {
        Value::List(Rc::new(RefCell::new(items)))
    }

    pub fn get_type(&self) -> TypeTag {
        match self {
            Value::Int(_) => TypeTag::Int,
            Value::Float(_) => TypeTag::Float,
            Value::Bool(_) => TypeTag::Bool,
            Value::None => TypeTag::None,
            Value::Str(_) => TypeTag::Str,
            Value::Complex(_, _) => TypeTag::Complex,
            Value::List(_) => TypeTag::List,
            Value::Tuple(_) => TypeTag::Tuple,
            Value::Set(_) => TypeTag::Set,
            Value::FrozenSet(_) => TypeTag::FrozenSet,
            Value::Dict(_) => TypeTag::Dict,
            Value::Bytes(_) => TypeTag::Bytes,
            Value::ByteArray(_) => TypeTag::ByteArray,
            Value::MemoryView(_) => TypeTag::MemoryView,
            Value::Range(_, _, _) => TypeTag::Range,
        }
    }

    // Hashability per spec §3: everything except the mutable/unsized
    // containers. Enforced here rather than via `std::hash::Hash` because
    // `Float`/`Complex` don't have a total `Eq` in Rust — dict/set bodies do
    // an equality scan instead of hashing (see dict.rs / collections.rs).
    pub fn is_hashable(&self) -> bool {
        !matches!(
            self,
            Value::List(_) | Value::Set(_) | Value::Dict(_) | Value::ByteArray(_) | Value::MemoryView(_)
        )
    }

    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Int(i) => *i != 0,
            Value::Float(f) => *f != 0.0,
            Value::Bool(b) => *b,
            Value::None => false,
            Value::Str(s) => !s.is_empty(),
            Value::Complex(re, im) => *re != 0.0 || *im != 0.0,
            Value::List(l) => !l.borrow().is_empty(),
            Value::Tuple(t) => !t.is_empty(),
            Value::Set(s) => !s.borrow().is_empty(),
            Value::FrozenSet(s) => !s.is_empty(),
            Value::Dict(d) => !d.borrow().is_empty(),
            Value::Bytes(b) => !b.is_empty(),
            Value::ByteArray(b) => !b.borrow().is_empty(),
            Value::MemoryView(b) => !b.borrow().is_empty(),
            Value::Range(start, stop, step) => range_len(*start, *stop, *step) != 0,
        }
    }

    // Natural per-variant equality (spec §4.1). Cross-type comparisons are
    // `false`, not an error — this mirrors the teacher's `eq` operator
    // ("Evaluate to false on type mismatch" in vm.rs) and Python's own `==`.
    pub fn value_eq(&self, other: &Value) -> bool {
        use Value::*;
        match (self, other) {
            (Int(a), Int(b)) => a == b,
            (Float(a), Float(b)) => a == b,
            (Int(a), Float(b)) | (Float(b), Int(a)) => (*a as f64) == *b,
            (Bool(a), Bool(b)) => a == b,
            (None, None) => true,
            (Str(a), Str(b)) => a == b,
            (Complex(ar, ai), Complex(br, bi)) => ar == br && ai == bi,
            (List(a), List(b)) => {
                let a = a.borrow();
                let b = b.borrow();
                a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| x.value_eq(y))
            }
            (Tuple(a), Tuple(b)) => {
                a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| x.value_eq(y))
            }
            (Set(a), Set(b)) => sets_equal(&a.borrow(), &b.borrow()),
            (FrozenSet(a), FrozenSet(b)) => sets_equal(a, b),
            (Dict(a), Dict(b)) => {
                let a = a.borrow();
                let b = b.borrow();
                a.len() == b.len()
                    && a.iter().all(|(k, v)| {
                        b.iter().any(|(k2, v2)| k.value_eq(k2) && v.value_eq(v2))
                    })
            }
            (Bytes(a), Bytes(b)) => a == b,
            (ByteArray(a), ByteArray(b)) => *a.borrow() == *b.borrow(),
            (MemoryView(a), MemoryView(b)) => *a.borrow() == *b.borrow(),
            (Range(s1, e1, st1), Range(s2, e2, st2)) => s1 == s2 && e1 == e2 && st1 == st2,
            _ => false,
        }
    }

    // Total ordering within numerics and within Str/Bytes only (spec §4.1);
    // anything else is a type error at the call site, not here.
    pub fn partial_cmp_numeric_or_text(&self, other: &Value) -> Option<std::cmp::Ordering> {
        use Value::*;
        match (self, other) {
            (Int(a), Int(b)) => a.partial_cmp(b),
            (Float(a), Float(b)) => a.partial_cmp(b),
            (Int(a), Float(b)) => (*a as f64).partial_cmp(b),
            (Float(a), Int(b)) => a.partial_cmp(&(*b as f64)),
            (Str(a), Str(b)) => a.as_str().partial_cmp(b.as_str()),
            (Bytes(a), Bytes(b)) => a.as_slice().partial_cmp(b.as_slice()),
            _ => Option::None,
        }
    }

    // Canonical printed form (spec §4.1). Does not need to round-trip
    // through the lexer.
    pub fn display(&self) -> String {
        match self {
            Value::Int(i) => i.to_string(),
            Value::Float(f) => format_float(*f),
            Value::Bool(b) => if *b { "true".to_string() } else { "false".to_string() },
            Value::None => "none".to_string(),
            Value::Str(s) => (**s).clone(),
            Value::Complex(re, im) => format!("({}{}{}j)", format_float(*re), if *im >= 0.0 { "+" } else { "" }, format_float(*im)),
            Value::List(l) => format!(
                "[{}]",
                l.borrow().iter().map(|v| v.repr()).collect::<Vec<_>>().join(", ")
            ),
            Value::Tuple(t) => format!(
                "({}{})",
                t.iter().map(|v| v.repr()).collect::<Vec<_>>().join(", "),
                if t.len() == 1 { "," } else { "" }
            ),
            Value::Set(s) => format!(
                "{{{}}}",
                s.borrow().iter().map(|v| v.repr()).collect::<Vec<_>>().join(", ")
            ),
            Value::FrozenSet(s) => format!(
                "frozenset({{{}}})",
                s.iter().map(|v| v.repr()).collect::<Vec<_>>().join(", ")
            ),
            Value::Dict(d) => format!(
                "{{{}}}",
                d.borrow()
                    .iter()
                    .map(|(k, v)| format!("{}: {}", k.repr(), v.repr()))
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
            Value::Bytes(b) => format!("b'{}'", bytes_repr(b)),
            Value::ByteArray(b) => format!("bytearray(b'{}')", bytes_repr(&b.borrow())),
            Value::MemoryView(b) => format!("<memory:{} bytes>", b.borrow().len()),
            Value::Range(start, stop, step) => format!("range({}, {}, {})", start, stop, step),
        }
    }

    // `repr`-style form used inside containers (quotes strings).
    fn repr(&self) -> String {
        match self {
            Value::Str(s) => format!("'{}'", s),
            other => other.display(),
        }
    }
}

fn format_float(f: f64) -> String {
    if f.fract() == 0.0 && f.is_finite() {
        format!("{:.1}", f)
    } else {
        format!("{}", f)
    }
}

fn bytes_repr(b: &[u8]) -> String {
    b.iter()
        .map(|byte| {
            if byte.is_ascii_graphic() || *byte == b' ' {
                (*byte as char).to_string()
            } else {
                format!("\\x{:02x}", byte)
            }
        })
        .collect()
}

fn sets_equal(a: &[Value], b: &[Value]) -> bool {
    a.len() == b.len()
        && a.iter().all(|x| b.iter().any(|y| x.value_eq(y)))
        && b.iter().all(|y| a.iter().any(|x| x.value_eq(y)))
}

pub fn range_len(start: i64, stop: i64, step: i64) -> i64 {
    if step == 0 {
        return 0;
    }
    if step > 0 {
        if stop <= start {
            0
        } else {
            (stop - start + step - 1) / step
        }
    } else {
        if stop >= start {
            0
        } else {
            (start - stop - step - 1) / (-step)
        }
    }
}
