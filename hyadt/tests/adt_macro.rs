use hyadt::prelude::*;

adt! {
    #[derive(Debug, Clone, PartialEq)]
    pub enum Expr {
        Num(value: f64),
        Add(lhs: Box<Expr>, rhs: Box<Expr>),
        Mul(lhs: Box<Expr>, rhs: Box<Expr>),
        /// A named free variable.
        Var(name: String),
        Sum(terms: Vec<Expr>),
        Zero,
    }
}

adt! {
    #[derive(Debug, PartialEq)]
    enum Count {
        Items(n: i64),
    }
}

fn num(value: f64) -> Box<Expr> {
    Box::new(Expr::Num { value })
}

#[test]
fn tags_and_metadata() {
    assert_eq!(Expr::NAME, "Expr");
    assert_eq!(Expr::TAGS, &["Num", "Add", "Mul", "Var", "Sum", "Zero"]);
    assert_eq!(Expr::Zero.tag(), "Zero");
    assert_eq!(
        Expr::Add {
            lhs: num(1.0),
            rhs: num(2.0)
        }
        .tag(),
        "Add"
    );
}

#[test]
fn into_and_from_variant() {
    let expr = Expr::Add {
        lhs: num(1.0),
        rhs: Box::new(Expr::Var {
            name: "x".to_string(),
        }),
    };
    let variant = expr.clone().into_variant();
    assert_eq!(
        variant,
        Variant::new(
            "Add",
            args![
                Variant::new("Num", args![1]),
                Variant::new("Var", args!["x"]),
            ],
        )
    );
    assert_eq!(variant.decode::<Expr>(), Some(expr));
}

#[test]
fn decoding_rejects_mismatched_shapes() {
    // unknown tag
    assert_eq!(Expr::from_variant(&Variant::nullary("Div")), None);
    // wrong arity
    assert_eq!(Expr::from_variant(&Variant::new("Num", args![])), None);
    assert_eq!(Expr::from_variant(&Variant::new("Num", args![1, 2])), None);
    assert_eq!(Expr::from_variant(&Variant::new("Zero", args![1])), None);
    // wrong field kind
    assert_eq!(Expr::from_variant(&Variant::new("Num", args!["1"])), None);
    assert_eq!(Count::from_variant(&Variant::new("Items", args![1.5])), None);
    assert_eq!(
        Count::from_variant(&Variant::new("Items", args![7])),
        Some(Count::Items { n: 7 })
    );
}

#[test]
fn typed_values_survive_the_text_round_trip() {
    let expr = Expr::Sum {
        terms: vec![
            Expr::Mul {
                lhs: num(2.0),
                rhs: num(3.5),
            },
            Expr::Var {
                name: "it's \"x\"".to_string(),
            },
            Expr::Zero,
        ],
    };

    let text = serialize(&expr.clone().into_value()).unwrap();
    assert_eq!(
        text,
        r#"Sum [(Mul (Num 2) (Num 3.5)),(Var "it\'s \"x\""),(Zero)]"#
    );

    let decoded = deserialize(&text).unwrap().unwrap();
    assert_eq!(<Expr as FromValue>::from_value(&decoded), Some(expr));
}

#[test]
fn typed_values_evaluate_through_dispatch() {
    fn num_arg(args: &[Value], i: usize) -> f64 {
        match args.get(i) {
            Some(Value::Num(n)) => *n,
            _ => f64::NAN,
        }
    }

    let eval = define!(
        Handlers::new()
            .on("Num", |_, args| Ok(Value::Num(num_arg(&args, 0))))
            .on("Add", |_, args| Ok(Value::Num(num_arg(&args, 0) + num_arg(&args, 1))))
            .on("Mul", |_, args| Ok(Value::Num(num_arg(&args, 0) * num_arg(&args, 1)))),
    );

    let expr = Expr::Add {
        lhs: Box::new(Expr::Mul {
            lhs: num(2.0),
            rhs: num(3.0),
        }),
        rhs: num(4.0),
    };
    assert_eq!(eval.evaluate(expr, args![]), Ok(Value::Num(10.0)));
}

#[test]
fn adt_constructors() {
    let eval = Evaluator::for_adt::<Expr>();
    assert_eq!(eval.table().len(), Expr::TAGS.len());

    let built = eval.construct("Var", args!["y"]).expect("Var constructor");
    assert_eq!(
        built.decode::<Expr>(),
        Some(Expr::Var {
            name: "y".to_string()
        })
    );
}
