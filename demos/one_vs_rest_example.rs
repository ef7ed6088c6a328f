use vehicle_origin::{Frame, OneVsRestClassifier, ShuffleSplit, encode_frame, metrics};
use ndarray::Axis;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== One-versus-Rest Origin Classification Example ===\n");

    // Small hand-made table: 4 cylinders mostly from Japan/Europe, 8 cylinders from the USA
    let data = "\
mpg,cylinders,year,origin
18,8,70,usa
15,8,70,usa
16,8,71,usa
14,8,72,usa
17,6,71,usa
24,4,70,japan
27,4,71,japan
31,4,72,japan
32,4,72,japan
26,4,70,europe
25,4,71,europe
29,6,72,europe
";
    let frame = Frame::from_reader(data.as_bytes())?;
    println!("Raw data:\n{}\n", frame.head(5));

    let encoded = encode_frame(&frame, &[("cylinders", "cyl"), ("year", "year")])?;
    println!("Encoded features: {:?}\n", encoded.feature_names);

    let split = ShuffleSplit::new(0.7).random_state(42).split(frame.n_rows())?;
    println!("Training samples: {}", split.train.len());
    println!("Test samples: {}\n", split.test.len());

    let origins = frame.unique("origin")?;
    let labels: Vec<String> = frame.column("origin")?.iter().map(|s| s.to_string()).collect();
    let pick = |rows: &[usize]| -> Vec<String> { rows.iter().map(|&i| labels[i].clone()).collect() };

    let x_train = encoded.features.select(Axis(0), &split.train);
    let x_test = encoded.features.select(Axis(0), &split.test);

    let mut classifier = OneVsRestClassifier::new();
    for report in classifier.fit(&x_train, &pick(&split.train), &origins)? {
        println!("In-sample accuracy for {}: {:.2}%", report.class, report.accuracy * 100.0);
    }

    let table = classifier.predict_proba(&x_test)?.with_index(split.test.clone())?;
    println!("\nClass probabilities:\n{}", table.head(10));

    let predicted = table.predict();
    let actual = pick(&split.test);
    println!("\nPredictions vs Actual:");
    for ((row, p), a) in table.index.iter().zip(&predicted).zip(&actual) {
        println!("Row {}: Actual={}, Predicted={}", row, a, p);
    }

    let accuracy = metrics::label_accuracy(&actual, &predicted)?;
    println!("\nHoldout accuracy: {:.2}%", accuracy * 100.0);

    Ok(())
}
