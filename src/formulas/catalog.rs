use std::f64::consts::PI;

use super::{Category, Formula, Inputs, Solver, Variable};

const fn var(symbol: &'static str, name: &'static str) -> Variable {
    Variable { symbol, name }
}

fn sin_deg(degrees: f64) -> f64 {
    degrees.to_radians().sin()
}

fn cos_deg(degrees: f64) -> f64 {
    degrees.to_radians().cos()
}

fn tan_deg(degrees: f64) -> f64 {
    degrees.to_radians().tan()
}

pub static CATEGORIES: [Category; 7] = [
    Category {
        id: "area",
        name: "Area Formulas",
        formulas: &[
            &CIRCLE_AREA,
            &SECTOR_AREA,
            &TRAPEZIUM_AREA,
            &CONE_SURFACE,
            &SPHERE_SURFACE,
        ],
    },
    Category {
        id: "volume",
        name: "Volume Formulas",
        formulas: &[&PRISM_VOLUME, &CYLINDER_VOLUME, &CONE_VOLUME, &SPHERE_VOLUME],
    },
    Category {
        id: "circle",
        name: "Circle Formulas",
        formulas: &[&CIRCLE_CIRCUMFERENCE, &CIRCLE_AREA, &ARC_LENGTH, &SECTOR_AREA],
    },
    Category {
        id: "triangle",
        name: "Triangle Formulas",
        formulas: &[&TRIANGLE_AREA_BASE, &TRIANGLE_AREA_SIN, &TRIANGLE_AREA_HERON],
    },
    Category {
        id: "finance",
        name: "Finance Formulas",
        formulas: &[&SIMPLE_INTEREST, &COMPOUND_INTEREST, &DEPRECIATION],
    },
    Category {
        id: "trigonometry",
        name: "Trigonometry",
        formulas: &[
            &PYTHAGORAS,
            &SINE,
            &COSINE,
            &TANGENT,
            &SINE_RULE,
            &COSINE_RULE,
        ],
    },
    Category {
        id: "algebra",
        name: "Algebra",
        formulas: &[&QUADRATIC_ROOTS],
    },
];

// Area

static CIRCLE_AREA: Formula = Formula {
    id: "circle_area",
    name: "Area of a circle",
    equation: "A = πr²",
    variables: &[var("A", "Area"), var("r", "Radius")],
    solvable_for: &["A", "r"],
    solver: Solver::Value(circle_area),
};

fn circle_area(target: &str, v: &Inputs<'_>) -> Option<f64> {
    match target {
        "A" => Some(PI * v.get("r").powi(2)),
        "r" => Some((v.get("A") / PI).sqrt()),
        _ => None,
    }
}

static SECTOR_AREA: Formula = Formula {
    id: "sector_area",
    name: "Area of a sector",
    equation: "A = (θ/360) × πr²",
    variables: &[
        var("A", "Area"),
        var("θ", "Angle (degrees)"),
        var("r", "Radius"),
    ],
    solvable_for: &["A", "θ", "r"],
    solver: Solver::Value(sector_area),
};

fn sector_area(target: &str, v: &Inputs<'_>) -> Option<f64> {
    let (a, theta, r) = (v.get("A"), v.get("θ"), v.get("r"));
    match target {
        "A" => Some(theta / 360.0 * PI * r * r),
        "θ" => Some(360.0 * a / (PI * r * r)),
        "r" => Some((360.0 * a / (theta * PI)).sqrt()),
        _ => None,
    }
}

static TRAPEZIUM_AREA: Formula = Formula {
    id: "trapezium_area",
    name: "Area of a trapezium",
    equation: "A = (1/2)(a + b)h",
    variables: &[
        var("A", "Area"),
        var("a", "Length of first parallel side"),
        var("b", "Length of second parallel side"),
        var("h", "Perpendicular distance"),
    ],
    solvable_for: &["A", "a", "b", "h"],
    solver: Solver::Value(trapezium_area),
};

fn trapezium_area(target: &str, v: &Inputs<'_>) -> Option<f64> {
    let (area, a, b, h) = (v.get("A"), v.get("a"), v.get("b"), v.get("h"));
    match target {
        "A" => Some(0.5 * (a + b) * h),
        "h" => Some(2.0 * area / (a + b)),
        "a" => Some(2.0 * area / h - b),
        "b" => Some(2.0 * area / h - a),
        _ => None,
    }
}

static CONE_SURFACE: Formula = Formula {
    id: "cone_surface",
    name: "Curved surface area of a cone",
    equation: "CSA = πrl",
    variables: &[
        var("CSA", "Curved surface area"),
        var("r", "Radius of the base"),
        var("l", "Slant height"),
    ],
    solvable_for: &["CSA", "r", "l"],
    solver: Solver::Value(cone_surface),
};

fn cone_surface(target: &str, v: &Inputs<'_>) -> Option<f64> {
    let (csa, r, l) = (v.get("CSA"), v.get("r"), v.get("l"));
    match target {
        "CSA" => Some(PI * r * l),
        "r" => Some(csa / (PI * l)),
        "l" => Some(csa / (PI * r)),
        _ => None,
    }
}

static SPHERE_SURFACE: Formula = Formula {
    id: "sphere_surface",
    name: "Surface area of a sphere",
    equation: "SA = 4πr²",
    variables: &[var("SA", "Surface area"), var("r", "Radius")],
    solvable_for: &["SA", "r"],
    solver: Solver::Value(sphere_surface),
};

fn sphere_surface(target: &str, v: &Inputs<'_>) -> Option<f64> {
    match target {
        "SA" => Some(4.0 * PI * v.get("r").powi(2)),
        "r" => Some((v.get("SA") / (4.0 * PI)).sqrt()),
        _ => None,
    }
}

// Volume

static PRISM_VOLUME: Formula = Formula {
    id: "prism_volume",
    name: "Volume of a prism",
    equation: "V = Ah",
    variables: &[
        var("V", "Volume"),
        var("A", "Area of cross-section"),
        var("h", "Perpendicular height"),
    ],
    solvable_for: &["V", "A", "h"],
    solver: Solver::Value(prism_volume),
};

fn prism_volume(target: &str, v: &Inputs<'_>) -> Option<f64> {
    let (vol, a, h) = (v.get("V"), v.get("A"), v.get("h"));
    match target {
        "V" => Some(a * h),
        "A" => Some(vol / h),
        "h" => Some(vol / a),
        _ => None,
    }
}

static CYLINDER_VOLUME: Formula = Formula {
    id: "cylinder_volume",
    name: "Volume of a cylinder",
    equation: "V = πr²h",
    variables: &[
        var("V", "Volume"),
        var("r", "Radius of the base"),
        var("h", "Perpendicular height"),
    ],
    solvable_for: &["V", "r", "h"],
    solver: Solver::Value(cylinder_volume),
};

fn cylinder_volume(target: &str, v: &Inputs<'_>) -> Option<f64> {
    let (vol, r, h) = (v.get("V"), v.get("r"), v.get("h"));
    match target {
        "V" => Some(PI * r * r * h),
        "r" => Some((vol / (PI * h)).sqrt()),
        "h" => Some(vol / (PI * r * r)),
        _ => None,
    }
}

static CONE_VOLUME: Formula = Formula {
    id: "cone_volume",
    name: "Volume of a cone/pyramid",
    equation: "V = (1/3)Ah",
    variables: &[
        var("V", "Volume"),
        var("A", "Area of the base"),
        var("h", "Perpendicular height"),
    ],
    solvable_for: &["V", "A", "h"],
    solver: Solver::Value(cone_volume),
};

fn cone_volume(target: &str, v: &Inputs<'_>) -> Option<f64> {
    let (vol, a, h) = (v.get("V"), v.get("A"), v.get("h"));
    match target {
        "V" => Some(a * h / 3.0),
        "A" => Some(3.0 * vol / h),
        "h" => Some(3.0 * vol / a),
        _ => None,
    }
}

static SPHERE_VOLUME: Formula = Formula {
    id: "sphere_volume",
    name: "Volume of a sphere",
    equation: "V = (4/3)πr³",
    variables: &[var("V", "Volume"), var("r", "Radius")],
    solvable_for: &["V", "r"],
    solver: Solver::Value(sphere_volume),
};

fn sphere_volume(target: &str, v: &Inputs<'_>) -> Option<f64> {
    match target {
        "V" => Some(4.0 / 3.0 * PI * v.get("r").powi(3)),
        "r" => Some((3.0 * v.get("V") / (4.0 * PI)).cbrt()),
        _ => None,
    }
}

// Circle

static CIRCLE_CIRCUMFERENCE: Formula = Formula {
    id: "circle_circumference",
    name: "Circumference of a circle",
    equation: "C = 2πr",
    variables: &[var("C", "Circumference"), var("r", "Radius")],
    solvable_for: &["C", "r"],
    solver: Solver::Value(circle_circumference),
};

fn circle_circumference(target: &str, v: &Inputs<'_>) -> Option<f64> {
    match target {
        "C" => Some(2.0 * PI * v.get("r")),
        "r" => Some(v.get("C") / (2.0 * PI)),
        _ => None,
    }
}

static ARC_LENGTH: Formula = Formula {
    id: "arc_length",
    name: "Arc length",
    equation: "S = (θ/360) × 2πr",
    variables: &[
        var("S", "Arc length"),
        var("θ", "Angle subtended by the arc (degrees)"),
        var("r", "Radius"),
    ],
    solvable_for: &["S", "θ", "r"],
    solver: Solver::Value(arc_length),
};

fn arc_length(target: &str, v: &Inputs<'_>) -> Option<f64> {
    let (s, theta, r) = (v.get("S"), v.get("θ"), v.get("r"));
    match target {
        "S" => Some(theta / 360.0 * 2.0 * PI * r),
        "θ" => Some(360.0 * s / (2.0 * PI * r)),
        "r" => Some(360.0 * s / (theta * 2.0 * PI)),
        _ => None,
    }
}

// Triangle

static TRIANGLE_AREA_BASE: Formula = Formula {
    id: "triangle_area_base",
    name: "Area of a triangle (base × height)",
    equation: "A = (1/2)bh",
    variables: &[
        var("A", "Area"),
        var("b", "Base length"),
        var("h", "Perpendicular height"),
    ],
    solvable_for: &["A", "b", "h"],
    solver: Solver::Value(triangle_area_base),
};

fn triangle_area_base(target: &str, v: &Inputs<'_>) -> Option<f64> {
    let (a, b, h) = (v.get("A"), v.get("b"), v.get("h"));
    match target {
        "A" => Some(0.5 * b * h),
        "b" => Some(2.0 * a / h),
        "h" => Some(2.0 * a / b),
        _ => None,
    }
}

static TRIANGLE_AREA_SIN: Formula = Formula {
    id: "triangle_area_sin",
    name: "Area of a triangle (two sides and included angle)",
    equation: "A = (1/2)ab sin C",
    variables: &[
        var("A", "Area"),
        var("a", "Length of first adjacent side"),
        var("b", "Length of second adjacent side"),
        var("C", "Included angle (degrees)"),
    ],
    solvable_for: &["A", "a", "b", "C"],
    solver: Solver::Value(triangle_area_sin),
};

fn triangle_area_sin(target: &str, v: &Inputs<'_>) -> Option<f64> {
    let (area, a, b, c) = (v.get("A"), v.get("a"), v.get("b"), v.get("C"));
    match target {
        "A" => Some(0.5 * a * b * sin_deg(c)),
        "a" => Some(2.0 * area / (b * sin_deg(c))),
        "b" => Some(2.0 * area / (a * sin_deg(c))),
        "C" => Some((2.0 * area / (a * b)).asin().to_degrees()),
        _ => None,
    }
}

static TRIANGLE_AREA_HERON: Formula = Formula {
    id: "triangle_area_heron",
    name: "Area of a triangle (Heron's formula)",
    equation: "A = √[s(s-a)(s-b)(s-c)] where s = (a+b+c)/2",
    variables: &[
        var("A", "Area"),
        var("a", "Length of first side"),
        var("b", "Length of second side"),
        var("c", "Length of third side"),
    ],
    solvable_for: &["A"],
    solver: Solver::Value(triangle_area_heron),
};

fn triangle_area_heron(target: &str, v: &Inputs<'_>) -> Option<f64> {
    let (a, b, c) = (v.get("a"), v.get("b"), v.get("c"));
    match target {
        "A" => {
            let s = (a + b + c) / 2.0;
            Some((s * (s - a) * (s - b) * (s - c)).sqrt())
        }
        _ => None,
    }
}

// Finance

static SIMPLE_INTEREST: Formula = Formula {
    id: "simple_interest",
    name: "Simple interest",
    equation: "SI = (P × R × T) / 100",
    variables: &[
        var("SI", "Simple Interest"),
        var("P", "Principal (initial amount)"),
        var("R", "Annual rate of interest (%)"),
        var("T", "Time (years)"),
    ],
    solvable_for: &["SI", "P", "R", "T"],
    solver: Solver::Value(simple_interest),
};

fn simple_interest(target: &str, v: &Inputs<'_>) -> Option<f64> {
    let (si, p, r, t) = (v.get("SI"), v.get("P"), v.get("R"), v.get("T"));
    match target {
        "SI" => Some(p * r * t / 100.0),
        "P" => Some(si * 100.0 / (r * t)),
        "R" => Some(si * 100.0 / (p * t)),
        "T" => Some(si * 100.0 / (p * r)),
        _ => None,
    }
}

static COMPOUND_INTEREST: Formula = Formula {
    id: "compound_interest",
    name: "Compound interest",
    equation: "A = P(1 + r/100)ⁿ",
    variables: &[
        var("A", "Total amount after n years"),
        var("P", "Principal (initial amount)"),
        var("r", "Annual rate of interest (%)"),
        var("n", "Number of years"),
    ],
    solvable_for: &["A", "P", "r", "n"],
    solver: Solver::Value(compound_interest),
};

fn compound_interest(target: &str, v: &Inputs<'_>) -> Option<f64> {
    let (a, p, r, n) = (v.get("A"), v.get("P"), v.get("r"), v.get("n"));
    let growth = 1.0 + r / 100.0;
    match target {
        "A" => Some(p * growth.powf(n)),
        "P" => Some(a / growth.powf(n)),
        "r" => Some(100.0 * ((a / p).powf(1.0 / n) - 1.0)),
        "n" => Some((a / p).ln() / growth.ln()),
        _ => None,
    }
}

static DEPRECIATION: Formula = Formula {
    id: "depreciation",
    name: "Depreciation",
    equation: "A = P(1 - r/100)ⁿ",
    variables: &[
        var("A", "Value after depreciation"),
        var("P", "Initial value"),
        var("r", "Annual rate of depreciation (%)"),
        var("n", "Number of years"),
    ],
    solvable_for: &["A", "P", "r", "n"],
    solver: Solver::Value(depreciation),
};

fn depreciation(target: &str, v: &Inputs<'_>) -> Option<f64> {
    let (a, p, r, n) = (v.get("A"), v.get("P"), v.get("r"), v.get("n"));
    let decay = 1.0 - r / 100.0;
    match target {
        "A" => Some(p * decay.powf(n)),
        "P" => Some(a / decay.powf(n)),
        "r" => Some(100.0 * (1.0 - (a / p).powf(1.0 / n))),
        "n" => Some((a / p).ln() / decay.ln()),
        _ => None,
    }
}

// Trigonometry

static PYTHAGORAS: Formula = Formula {
    id: "pythagoras",
    name: "Pythagorean theorem",
    equation: "a² = b² + c²",
    variables: &[
        var("a", "Length of hypotenuse"),
        var("b", "Length of opposite side"),
        var("c", "Length of adjacent side"),
    ],
    solvable_for: &["a", "b", "c"],
    solver: Solver::Value(pythagoras),
};

fn pythagoras(target: &str, v: &Inputs<'_>) -> Option<f64> {
    let (a, b, c) = (v.get("a"), v.get("b"), v.get("c"));
    match target {
        "a" => Some((b * b + c * c).sqrt()),
        "b" => Some((a * a - c * c).sqrt()),
        "c" => Some((a * a - b * b).sqrt()),
        _ => None,
    }
}

static SINE: Formula = Formula {
    id: "sine",
    name: "Sine ratio",
    equation: "sin θ = opposite / hypotenuse",
    variables: &[
        var("θ", "Angle (degrees)"),
        var("opposite", "Opposite side"),
        var("hypotenuse", "Hypotenuse"),
    ],
    solvable_for: &["θ", "opposite", "hypotenuse"],
    solver: Solver::Value(sine),
};

fn sine(target: &str, v: &Inputs<'_>) -> Option<f64> {
    let (theta, opp, hyp) = (v.get("θ"), v.get("opposite"), v.get("hypotenuse"));
    match target {
        "θ" => Some((opp / hyp).asin().to_degrees()),
        "opposite" => Some(hyp * sin_deg(theta)),
        "hypotenuse" => Some(opp / sin_deg(theta)),
        _ => None,
    }
}

static COSINE: Formula = Formula {
    id: "cosine",
    name: "Cosine ratio",
    equation: "cos θ = adjacent / hypotenuse",
    variables: &[
        var("θ", "Angle (degrees)"),
        var("adjacent", "Adjacent side"),
        var("hypotenuse", "Hypotenuse"),
    ],
    solvable_for: &["θ", "adjacent", "hypotenuse"],
    solver: Solver::Value(cosine),
};

fn cosine(target: &str, v: &Inputs<'_>) -> Option<f64> {
    let (theta, adj, hyp) = (v.get("θ"), v.get("adjacent"), v.get("hypotenuse"));
    match target {
        "θ" => Some((adj / hyp).acos().to_degrees()),
        "adjacent" => Some(hyp * cos_deg(theta)),
        "hypotenuse" => Some(adj / cos_deg(theta)),
        _ => None,
    }
}

static TANGENT: Formula = Formula {
    id: "tangent",
    name: "Tangent ratio",
    equation: "tan θ = opposite / adjacent",
    variables: &[
        var("θ", "Angle (degrees)"),
        var("opposite", "Opposite side"),
        var("adjacent", "Adjacent side"),
    ],
    solvable_for: &["θ", "opposite", "adjacent"],
    solver: Solver::Value(tangent),
};

fn tangent(target: &str, v: &Inputs<'_>) -> Option<f64> {
    let (theta, opp, adj) = (v.get("θ"), v.get("opposite"), v.get("adjacent"));
    match target {
        "θ" => Some((opp / adj).atan().to_degrees()),
        "opposite" => Some(adj * tan_deg(theta)),
        "adjacent" => Some(opp / tan_deg(theta)),
        _ => None,
    }
}

static SINE_RULE: Formula = Formula {
    id: "sine_rule",
    name: "Sine rule",
    equation: "a/sin A = b/sin B = c/sin C",
    variables: &[
        var("a", "Side a"),
        var("A", "Angle A (degrees) opposite side a"),
        var("b", "Side b"),
        var("B", "Angle B (degrees) opposite side b"),
    ],
    solvable_for: &["a", "A", "b", "B"],
    solver: Solver::Value(sine_rule),
};

fn sine_rule(target: &str, v: &Inputs<'_>) -> Option<f64> {
    let (a, angle_a, b, angle_b) = (v.get("a"), v.get("A"), v.get("b"), v.get("B"));
    match target {
        "a" => Some(b * sin_deg(angle_a) / sin_deg(angle_b)),
        "b" => Some(a * sin_deg(angle_b) / sin_deg(angle_a)),
        "A" => Some((a * sin_deg(angle_b) / b).asin().to_degrees()),
        "B" => Some((b * sin_deg(angle_a) / a).asin().to_degrees()),
        _ => None,
    }
}

static COSINE_RULE: Formula = Formula {
    id: "cosine_rule",
    name: "Cosine rule",
    equation: "a² = b² + c² - 2bc cos A",
    variables: &[
        var("a", "Side a"),
        var("b", "Side b"),
        var("c", "Side c"),
        var("A", "Angle A (degrees) opposite side a"),
    ],
    solvable_for: &["a", "A"],
    solver: Solver::Value(cosine_rule),
};

fn cosine_rule(target: &str, v: &Inputs<'_>) -> Option<f64> {
    let (a, b, c, angle_a) = (v.get("a"), v.get("b"), v.get("c"), v.get("A"));
    match target {
        "a" => Some((b * b + c * c - 2.0 * b * c * cos_deg(angle_a)).sqrt()),
        "A" => Some(((b * b + c * c - a * a) / (2.0 * b * c)).acos().to_degrees()),
        _ => None,
    }
}

// Algebra

static QUADRATIC_ROOTS: Formula = Formula {
    id: "quadratic_roots",
    name: "Roots of quadratic equation",
    equation: "ax² + bx + c = 0",
    variables: &[
        var("a", "Coefficient of x²"),
        var("b", "Coefficient of x"),
        var("c", "Constant term"),
    ],
    solvable_for: &["x"],
    solver: Solver::Roots(quadratic_roots),
};

fn quadratic_roots(v: &Inputs<'_>) -> Option<(f64, f64)> {
    let (a, b, c) = (v.get("a"), v.get("b"), v.get("c"));
    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        return None;
    }
    let root = discriminant.sqrt();
    Some(((-b + root) / (2.0 * a), (-b - root) / (2.0 * a)))
}
