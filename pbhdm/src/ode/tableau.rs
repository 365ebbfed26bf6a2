use nalgebra::{DMatrix, DVector};

/// A butcher tableau for a Runge-Kutta method.
///
/// The tableau is defined by the matrices `a`, `b`, `c` and `d` and the order of the method.
/// The butchers tableau is often depicted like this example of a 3-stage method:
///
/// ```text
/// c1 | a11 0   0
/// c2 | a21 a22 0
/// c3 | a31 a32 a33
/// -------------------
///   | b1  b2  b3
///   | be1 be2 be3
/// -------------------
///   | d1  d2  d3
/// ```
///
/// where `be` is the embedded method for error control and `d` is the difference between the main and embedded method.
///
/// For continous extension methods, the beta matrix is also included.
///
#[derive(Clone)]
pub struct Tableau {
    a: DMatrix<f64>,
    b: DVector<f64>,
    c: DVector<f64>,
    d: DVector<f64>,
    order: usize,
    beta: Option<DMatrix<f64>>,
}

impl Tableau {
    /// The 5th order method of Tsitouras with an embedded 4th order method for
    /// error control and a 4th order continuous extension.
    ///
    /// From Tsitouras, Ch. (2011). Runge-Kutta pairs of order 5(4) satisfying
    /// only the first column simplifying assumption. Computers & Mathematics
    /// with Applications, 62(2), 770-775.
    pub fn tsit45() -> Self {
        let c = DVector::from_vec(vec![
            0.0,
            0.161,
            0.327,
            0.9,
            0.9800255409045097,
            1.0,
            1.0,
        ]);

        let b = DVector::from_vec(vec![
            0.09646076681806523,
            0.01,
            0.4798896504144996,
            1.379008574103742,
            -3.290069515436081,
            2.324710524099774,
            0.0,
        ]);

        let d = DVector::from_vec(vec![
            -0.001_780_011_052_225_777,
            -0.0008164344596567469,
            0.007880878010261995,
            -0.1447110071732629,
            0.5823571654525552,
            -0.45808210592918697,
            0.015151515151515152,
        ]);

        let mut a = DMatrix::zeros(7, 7);
        a[(2, 1)] = 0.335_480_655_492_357;
        a[(3, 1)] = -6.359448489975075;
        a[(4, 1)] = -11.74888356406283;
        a[(5, 1)] = -12.92096931784711;
        a[(3, 2)] = 4.362295432869581;
        a[(4, 2)] = 7.495539342889836;
        a[(5, 2)] = 8.159367898576159;
        a[(4, 3)] = -0.09249506636175525;
        a[(5, 3)] = -0.071_584_973_281_401;
        a[(5, 4)] = -0.02826905039406838;
        for i in 1..7 {
            let mut a_sum = 0.0;
            for j in 1..i {
                a_sum += a[(i, j)];
            }
            a[(i, 0)] = c[i] - a_sum;
        }
        for j in 0..6 {
            a[(6, j)] = b[j];
        }

        // coefficients for the dense output polynomial in theta, one row
        // per stage, one column per power of theta
        let beta = DMatrix::from_vec(
            7,
            4,
            vec![
                1.0,
                0.0,
                0.0,
                0.0,
                0.0,
                0.0,
                0.0,
                -2.76370619727483,
                0.1317,
                3.93029623689475,
                -12.4110771669337,
                37.509313416511,
                -27.8965262891973,
                1.5,
                2.91325546182191,
                -0.2234,
                -5.9410338721315,
                30.3381886302823,
                -88.1789048947664,
                65.0918946747937,
                -4.0,
                -1.05308849772902,
                0.1017,
                2.49062728565125,
                -16.5481028892449,
                47.3795219628193,
                -34.8706578614966,
                2.5,
            ],
        );

        let order = 4;
        Self::new(a, b, c, d, order, Some(beta))
    }

    /// The Dormand-Prince 5(4) pair.
    ///
    /// From Dormand, J. R. and Prince, P. J. (1980). A family of embedded
    /// Runge-Kutta formulae. Journal of Computational and Applied
    /// Mathematics, 6(1), 19-26. No dense output coefficients are included,
    /// so interpolation falls back to cubic hermite.
    pub fn dopri45() -> Self {
        let c = DVector::from_vec(vec![
            0.0,
            1.0 / 5.0,
            3.0 / 10.0,
            4.0 / 5.0,
            8.0 / 9.0,
            1.0,
            1.0,
        ]);

        let b = DVector::from_vec(vec![
            35.0 / 384.0,
            0.0,
            500.0 / 1113.0,
            125.0 / 192.0,
            -2187.0 / 6784.0,
            11.0 / 84.0,
            0.0,
        ]);

        let b_hat = DVector::from_vec(vec![
            5179.0 / 57600.0,
            0.0,
            7571.0 / 16695.0,
            393.0 / 640.0,
            -92097.0 / 339200.0,
            187.0 / 2100.0,
            1.0 / 40.0,
        ]);
        let d = &b - &b_hat;

        let mut a = DMatrix::zeros(7, 7);
        a[(1, 0)] = 1.0 / 5.0;
        a[(2, 0)] = 3.0 / 40.0;
        a[(2, 1)] = 9.0 / 40.0;
        a[(3, 0)] = 44.0 / 45.0;
        a[(3, 1)] = -56.0 / 15.0;
        a[(3, 2)] = 32.0 / 9.0;
        a[(4, 0)] = 19372.0 / 6561.0;
        a[(4, 1)] = -25360.0 / 2187.0;
        a[(4, 2)] = 64448.0 / 6561.0;
        a[(4, 3)] = -212.0 / 729.0;
        a[(5, 0)] = 9017.0 / 3168.0;
        a[(5, 1)] = -355.0 / 33.0;
        a[(5, 2)] = 46732.0 / 5247.0;
        a[(5, 3)] = 49.0 / 176.0;
        a[(5, 4)] = -5103.0 / 18656.0;
        for j in 0..7 {
            a[(6, j)] = b[j];
        }

        let order = 4;
        Self::new(a, b, c, d, order, None)
    }

    pub fn new(
        a: DMatrix<f64>,
        b: DVector<f64>,
        c: DVector<f64>,
        d: DVector<f64>,
        order: usize,
        beta: Option<DMatrix<f64>>,
    ) -> Self {
        let s = c.len();
        assert_eq!(a.ncols(), s, "Invalid number of rows in a, expected {s}");
        assert_eq!(a.nrows(), s, "Invalid number of columns in a, expected {s}",);
        assert_eq!(b.len(), s, "Invalid number of elements in b, expected {s}",);
        assert_eq!(d.len(), s, "Invalid number of elements in d, expected {s}",);
        if let Some(beta) = &beta {
            assert_eq!(
                beta.nrows(),
                s,
                "Invalid number of rows in beta, expected {s}",
            );
        }
        Self {
            a,
            b,
            c,
            d,
            order,
            beta,
        }
    }

    pub fn order(&self) -> usize {
        self.order
    }

    pub fn s(&self) -> usize {
        self.c.len()
    }

    pub fn a(&self) -> &DMatrix<f64> {
        &self.a
    }

    pub fn b(&self) -> &DVector<f64> {
        &self.b
    }

    pub fn c(&self) -> &DVector<f64> {
        &self.c
    }

    pub fn d(&self) -> &DVector<f64> {
        &self.d
    }

    pub fn beta(&self) -> Option<&DMatrix<f64>> {
        self.beta.as_ref()
    }
}
